//! Streaming tag scanner for HTML-like markup.
//!
//! The scanner walks raw text and yields one [`TagEvent`] per open tag. It
//! does not build a tree: close tags, comments and declarations are consumed
//! and dropped. Two modes exist:
//!
//! - HTML mode: attribute values are quoted or bare.
//! - XML mode (JSX, Svelte, Astro): additionally accepts braced expressions
//!   `{...}` as attribute values and skips `{...spread}` attributes.
//!
//! Line numbers count newlines in text runs only. Newlines inside a tag
//! (between attributes or inside values) do not advance the counter.
//!
//! Malformed input never panics. On a fault the iterator ends and
//! [`Scanner::fault`] reports why; events already yielded stay valid.

pub mod attributes;

pub use attributes::Attributes;

/// An open tag found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    /// Tag name as written
    pub name: String,
    pub attributes: Attributes,
    /// 0-based line, counted from newlines in preceding text runs
    pub line: usize,
    /// Byte offset of the `<` in the scanned text
    pub offset: usize,
}

/// Reasons a scan can end before the input is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFault {
    /// A tag opened at `offset` never reached its `>`
    UnterminatedTag { offset: usize },
    /// A quoted attribute value starting at `offset` has no closing quote
    UnterminatedValue { offset: usize },
    /// A braced expression starting at `offset` never closes
    UnbalancedBraces { offset: usize },
    /// A comment or CDATA section starting at `offset` never closes
    UnterminatedComment { offset: usize },
}

impl std::fmt::Display for ScanFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedTag { offset } => write!(f, "unterminated tag at byte {}", offset),
            Self::UnterminatedValue { offset } => {
                write!(f, "unterminated attribute value at byte {}", offset)
            }
            Self::UnbalancedBraces { offset } => {
                write!(f, "unbalanced braces in expression at byte {}", offset)
            }
            Self::UnterminatedComment { offset } => {
                write!(f, "unterminated comment at byte {}", offset)
            }
        }
    }
}

impl std::error::Error for ScanFault {}

/// Start a fresh scan of `text`.
pub fn scan(text: &str, xml_mode: bool) -> Scanner<'_> {
    Scanner::new(text, xml_mode)
}

/// Pull-based scanner; see the module docs.
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    xml_mode: bool,
    /// Set after an open `<script>` or `<style>`; holds the lowercase name
    raw_text_end: Option<&'static str>,
    fault: Option<ScanFault>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str, xml_mode: bool) -> Self {
        Self {
            input,
            pos: 0,
            line: 0,
            xml_mode,
            raw_text_end: None,
            fault: None,
            finished: false,
        }
    }

    /// The fault that ended the scan early, if any.
    pub fn fault(&self) -> Option<&ScanFault> {
        self.fault.as_ref()
    }

    /// Current line counter (0-based).
    pub fn line(&self) -> usize {
        self.line
    }

    fn count_text(&mut self, start: usize, end: usize) {
        let input = self.input;
        self.line += input.as_bytes()[start..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
    }

    /// Consume `<script>`/`<style>` content up to (not including) its close tag.
    fn skip_raw_text(&mut self, tag: &str) {
        let input = self.input;
        let start = self.pos;
        let end = find_close_tag(&input.as_bytes()[start..], tag.as_bytes())
            .map(|rel| start + rel)
            .unwrap_or(input.len());
        self.count_text(start, end);
        self.pos = end;
    }

    /// Handle markup starting at `self.pos` (which is a `<`).
    /// Returns `Ok(None)` for anything that is not an open tag.
    fn read_markup(&mut self) -> Result<Option<TagEvent>, ScanFault> {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos;
        let rest = &bytes[start..];

        if rest.starts_with(b"<!--") {
            let end = find(&bytes[start + 4..], b"-->")
                .ok_or(ScanFault::UnterminatedComment { offset: start })?;
            self.pos = start + 4 + end + 3;
            return Ok(None);
        }

        if rest.starts_with(b"<![CDATA[") {
            let end = find(&bytes[start + 9..], b"]]>")
                .ok_or(ScanFault::UnterminatedComment { offset: start })?;
            self.pos = start + 9 + end + 3;
            return Ok(None);
        }

        if rest.starts_with(b"<!") || rest.starts_with(b"<?") {
            let end = rest
                .iter()
                .position(|&b| b == b'>')
                .ok_or(ScanFault::UnterminatedTag { offset: start })?;
            self.pos = start + end + 1;
            return Ok(None);
        }

        if rest.len() > 2 && rest[1] == b'/' && rest[2].is_ascii_alphabetic() {
            let end = rest
                .iter()
                .position(|&b| b == b'>')
                .ok_or(ScanFault::UnterminatedTag { offset: start })?;
            self.pos = start + end + 1;
            return Ok(None);
        }

        if rest.len() > 1 && rest[1].is_ascii_alphabetic() {
            return self.read_open_tag().map(Some);
        }

        // A lone `<` is text (`a < b` in component files)
        self.pos = start + 1;
        Ok(None)
    }

    fn read_open_tag(&mut self) -> Result<TagEvent, ScanFault> {
        let input = self.input;
        let bytes = input.as_bytes();
        let len = bytes.len();
        let start = self.pos;
        let unterminated = ScanFault::UnterminatedTag { offset: start };

        let mut i = start + 1;
        while i < len && is_tag_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &input[start + 1..i];

        let mut attributes = Attributes::new();
        let mut self_closing = false;

        loop {
            i = skip_whitespace(bytes, i);
            if i >= len {
                return Err(unterminated);
            }

            match bytes[i] {
                b'>' => {
                    i += 1;
                    break;
                }
                b'/' => {
                    if bytes.get(i + 1) == Some(&b'>') {
                        self_closing = true;
                        i += 2;
                        break;
                    }
                    i += 1;
                    continue;
                }
                b'{' if self.xml_mode => {
                    // {...props}
                    i = skip_braced(bytes, i)?;
                    continue;
                }
                _ => {}
            }

            let name_start = i;
            while i < len && !is_attr_name_terminator(bytes[i]) {
                i += 1;
            }
            if i == name_start {
                i += 1;
                continue;
            }
            let attr_name = &input[name_start..i];

            let after_name = skip_whitespace(bytes, i);
            if bytes.get(after_name) != Some(&b'=') {
                attributes.insert(attr_name, "");
                i = after_name;
                continue;
            }

            i = skip_whitespace(bytes, after_name + 1);
            if i >= len {
                return Err(unterminated);
            }
            let (value, next) = self.read_value(i)?;
            attributes.insert(attr_name, value);
            i = next;
        }

        self.pos = i;
        if !self_closing {
            self.raw_text_end = raw_text_element(name);
        }

        Ok(TagEvent {
            name: name.to_string(),
            attributes,
            line: self.line,
            offset: start,
        })
    }

    /// Read an attribute value starting at `i`; returns the value and the
    /// index just past it.
    fn read_value(&self, i: usize) -> Result<(String, usize), ScanFault> {
        let input = self.input;
        let bytes = input.as_bytes();

        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                let end = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == quote)
                    .ok_or(ScanFault::UnterminatedValue { offset: i })?;
                let raw = &input[i + 1..i + 1 + end];
                Ok((decode_entities(raw), i + end + 2))
            }
            b'{' if self.xml_mode => {
                let end = skip_braced(bytes, i)?;
                Ok((input[i..end].to_string(), end))
            }
            _ => {
                let mut end = i;
                while end < bytes.len() {
                    let b = bytes[end];
                    if b.is_ascii_whitespace()
                        || b == b'>'
                        || (b == b'/' && bytes.get(end + 1) == Some(&b'>'))
                    {
                        break;
                    }
                    end += 1;
                }
                Ok((decode_entities(&input[i..end]), end))
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = TagEvent;

    fn next(&mut self) -> Option<TagEvent> {
        if self.finished {
            return None;
        }

        loop {
            if let Some(tag) = self.raw_text_end.take() {
                self.skip_raw_text(tag);
            }

            let input = self.input;
            let bytes = input.as_bytes();
            let start = self.pos;
            if start >= bytes.len() {
                self.finished = true;
                return None;
            }

            match bytes[start..].iter().position(|&b| b == b'<') {
                Some(rel) => {
                    self.count_text(start, start + rel);
                    self.pos = start + rel;
                }
                None => {
                    self.count_text(start, bytes.len());
                    self.pos = bytes.len();
                    self.finished = true;
                    return None;
                }
            }

            match self.read_markup() {
                Ok(Some(event)) => return Some(event),
                Ok(None) => continue,
                Err(fault) => {
                    log::debug!("Scan stopped early: {}", fault);
                    self.fault = Some(fault);
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}

pub(crate) fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

fn is_attr_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn raw_text_element(name: &str) -> Option<&'static str> {
    if name.eq_ignore_ascii_case("script") {
        Some("script")
    } else if name.eq_ignore_ascii_case("style") {
        Some("style")
    } else {
        None
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Find `</name` (ASCII case-insensitive) followed by a non-name byte.
pub(crate) fn find_close_tag(haystack: &[u8], name: &[u8]) -> Option<usize> {
    let n = name.len() + 2;
    let mut i = 0;
    while i + n <= haystack.len() {
        let rel = haystack[i..].iter().position(|&b| b == b'<')?;
        i += rel;
        if i + n > haystack.len() {
            return None;
        }
        if haystack[i + 1] == b'/'
            && haystack[i + 2..i + n].eq_ignore_ascii_case(name)
            && haystack.get(i + n).is_none_or(|&b| !is_tag_name_byte(b))
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Skip a `{...}` expression starting at `start`, honouring nested braces
/// and string literals. Returns the index just past the closing brace.
fn skip_braced(bytes: &[u8], start: usize) -> Result<usize, ScanFault> {
    let fault = ScanFault::UnbalancedBraces { offset: start };
    let mut depth = 0usize;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(fault);
                }
            }
            _ => {}
        }
        i += 1;
    }

    Err(fault)
}

/// Decode the character references that commonly appear in attribute values.
/// Unknown references are left as written.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
