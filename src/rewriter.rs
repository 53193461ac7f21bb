//! Line-level alt attribute rewriting.
//!
//! Fixes operate on a single line of source text: the opening tag is located
//! with a pattern, any existing `alt` is dropped and a new one appended before
//! the closing bracket. Tags whose `>` lies on a later line get the attribute
//! inserted right after the tag name instead. Anything the patterns cannot
//! handle (a `>` inside an unquoted expression, deeply nested braces) leaves
//! the line untouched.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Config, SupportedTags};
use crate::dialect::Dialect;
use crate::linter::rules::poor_alt::is_poor_alt;
use crate::scanner;

// Quoted and braced values (kept as they are) or an `alt` assignment with
// its leading whitespace: `alt=...`, bare `alt`, `:alt`, `v-bind:alt`. A
// bare `alt` leaves the byte that ends it in `next`.
static EXISTING_ALT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)"[^"]*"|'[^']*'|\{(?:[^{}]|\{[^{}]*\})*\}|(?P<alt>\s+(?:v-bind:|:)?alt(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{(?:[^{}]|\{[^{}]*\})*\}|(?:[^\s>/"'{]|/[^\s>])+)|(?P<next>[\s/>]|$)))"#,
    )
    .expect("valid alt pattern")
});

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z][\w.:-]*)").expect("valid tag pattern"));

/// Attribute text of an open tag: quoted strings, braced expressions (one
/// level of nesting) or any other byte except `>`.
const ATTRIBUTES: &str = r#"(?:"[^"]*"|'[^']*'|\{(?:[^{}]|\{[^{}]*\})*\}|[^>"'{])"#;

/// The tag was not found on the line, not even as an unterminated open tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteNoMatch {
    pub tag_name: String,
}

impl std::fmt::Display for RewriteNoMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no <{}> tag found on line", self.tag_name)
    }
}

impl std::error::Error for RewriteNoMatch {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest<'a> {
    pub line_text: &'a str,
    pub tag_name: &'a str,
    pub new_alt_text: &'a str,
    pub use_self_closing_syntax: bool,
}

impl RewriteRequest<'_> {
    pub fn apply(&self) -> String {
        rewrite(
            self.line_text,
            self.tag_name,
            self.new_alt_text,
            self.use_self_closing_syntax,
        )
    }
}

/// Give the first `tag_name` tag on `line_text` exactly one
/// `alt="new_alt_text"`. Returns the line unchanged when no tag is found.
///
/// `new_alt_text` is inserted verbatim; a `"` inside it is not escaped.
pub fn rewrite(
    line_text: &str,
    tag_name: &str,
    new_alt_text: &str,
    self_closing_syntax: bool,
) -> String {
    try_rewrite(line_text, tag_name, new_alt_text, self_closing_syntax).unwrap_or_else(|e| {
        log::debug!("Leaving line unchanged: {}", e);
        line_text.to_string()
    })
}

pub fn try_rewrite(
    line_text: &str,
    tag_name: &str,
    new_alt_text: &str,
    self_closing_syntax: bool,
) -> Result<String, RewriteNoMatch> {
    let no_match = || RewriteNoMatch {
        tag_name: tag_name.to_string(),
    };
    let tag = regex::escape(tag_name.trim());
    if tag.is_empty() {
        return Err(no_match());
    }

    let full = Regex::new(&format!(
        r"(?i)<(?P<name>{tag})(?P<attrs>(?:\s{ATTRIBUTES}*?)?)\s*(?P<close>/?)>"
    ))
    .map_err(|_| no_match())?;

    if let Some(caps) = full.captures(line_text)
        && let (Some(whole), Some(name), Some(attrs), Some(close)) = (
            caps.get(0),
            caps.name("name"),
            caps.name("attrs"),
            caps.name("close"),
        )
    {
        let kept = strip_alt(attrs.as_str());
        let kept = collapse_whitespace(kept.trim());

        let mut new_tag = format!("<{}", name.as_str());
        if !kept.is_empty() {
            new_tag.push(' ');
            new_tag.push_str(&kept);
        }
        new_tag.push_str(&format!(" alt=\"{}\"", new_alt_text));
        if self_closing_syntax || !close.as_str().is_empty() {
            new_tag.push_str(" />");
        } else {
            new_tag.push('>');
        }

        let out = format!(
            "{}{}{}",
            &line_text[..whole.start()],
            new_tag,
            &line_text[whole.end()..]
        );
        return Ok(out.trim_end().to_string());
    }

    // The open tag continues on a later line: insert after the name
    let loose = Regex::new(&format!(r"(?i)<(?P<name>{tag})(?:\s|$)")).map_err(|_| no_match())?;
    let name = loose
        .captures(line_text)
        .and_then(|caps| caps.name("name"))
        .ok_or_else(no_match)?;

    log::debug!("No complete <{}> on line, inserting after tag name", tag_name);
    let rest = strip_alt(&line_text[name.end()..]);
    let out = format!(
        "{} alt=\"{}\"{}",
        &line_text[..name.end()],
        new_alt_text,
        rest
    );
    Ok(out.trim_end().to_string())
}

/// Remove every alt assignment outside quoted or braced values. Repeats
/// because a bare `alt` consumes the whitespace an adjacent `alt` needs.
fn strip_alt(attrs: &str) -> String {
    let mut out = attrs.to_string();
    loop {
        let next = EXISTING_ALT
            .replace_all(&out, |caps: &regex::Captures<'_>| match caps.name("alt") {
                Some(_) => caps
                    .name("next")
                    .map_or(String::new(), |m| m.as_str().to_string()),
                None => caps[0].to_string(),
            })
            .into_owned();
        if next == out {
            return out;
        }
        out = next;
    }
}

/// Collapse whitespace runs to one space outside quoted or braced values.
fn collapse_whitespace(attrs: &str) -> String {
    let mut out = String::with_capacity(attrs.len());
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut pending_space = false;

    for c in attrs.chars() {
        if quote.is_none() && depth == 0 && c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if depth == 0 => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => depth = depth.saturating_sub(1),
            _ => {}
        }
        out.push(c);
    }

    out
}

/// 0-based line holding the byte at `offset`. Unlike `Issue::line`, this
/// counts newlines inside earlier multi-line tags, so it is the line to edit.
pub fn tag_line(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count()
}

/// Text of a 0-based line without its line ending.
pub fn line_text(text: &str, line: usize) -> Option<&str> {
    text.split('\n')
        .nth(line)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
}

/// Replace a 0-based line, keeping its original line ending.
pub fn replace_line(text: &str, line: usize, new_line: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len() + new_line.len());
    let mut found = false;

    for (i, segment) in text.split_inclusive('\n').enumerate() {
        if i == line {
            let ending = if segment.ends_with("\r\n") {
                "\r\n"
            } else if segment.ends_with('\n') {
                "\n"
            } else {
                ""
            };
            out.push_str(new_line);
            out.push_str(ending);
            found = true;
        } else {
            out.push_str(segment);
        }
    }

    found.then_some(out)
}

/// Name of the tag a fix on `line` should target: the first supported tag
/// the scanner finds, then the first supported `<name` at all, then `img`.
pub fn target_tag(line: &str, supported_tags: &SupportedTags) -> String {
    if let Some(event) = scanner::scan(line, true).find(|e| supported_tags.contains(&e.name)) {
        return event.name;
    }

    ANY_TAG
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|name| supported_tags.contains(name))
        .unwrap_or("img")
        .to_string()
}

/// Result of fixing every issue in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub output: String,
    pub fixed: usize,
    /// Issues with no alt text available or whose line could not be rewritten
    pub skipped: usize,
}

/// Apply an automatic fix to every issue in `text`.
///
/// The alt text is `config.placeholder` when set, otherwise the file-name
/// suggestion of each issue. Edits target the line of the tag's `<`, and
/// each line is rewritten at most once.
pub fn fix_document(text: &str, dialect: Dialect, config: &Config) -> FixOutcome {
    let issues = crate::check(text, dialect, config);
    if let Some(placeholder) = &config.placeholder
        && !issues.is_empty()
        && is_poor_alt(placeholder)
    {
        log::warn!(
            "Placeholder \"{}\" is itself poor alt text; fixed tags will still be reported",
            placeholder
        );
    }
    let mut replacements: HashMap<usize, String> = HashMap::new();
    let mut skipped = 0;

    for issue in &issues {
        let line = tag_line(text, issue.offset);
        if replacements.contains_key(&line) {
            skipped += 1;
            continue;
        }

        let alt = match config.placeholder.clone().or_else(|| issue.suggested_alt()) {
            Some(alt) => alt,
            None => {
                log::debug!("No alt text available for line {}", line + 1);
                skipped += 1;
                continue;
            }
        };

        let Some(current) = line_text(text, line) else {
            skipped += 1;
            continue;
        };

        let rewritten = rewrite(
            current,
            &issue.tag_name,
            &alt,
            dialect.self_closing_syntax(),
        );
        if rewritten == current {
            skipped += 1;
            continue;
        }
        replacements.insert(line, rewritten);
    }

    let fixed = replacements.len();
    let output = if replacements.is_empty() {
        text.to_string()
    } else {
        text.split_inclusive('\n')
            .enumerate()
            .map(|(i, segment)| match replacements.get(&i) {
                Some(new_line) => {
                    let ending = &segment[segment.trim_end_matches(['\r', '\n']).len()..];
                    format!("{}{}", new_line, ending)
                }
                None => segment.to_string(),
            })
            .collect()
    };

    FixOutcome {
        output,
        fixed,
        skipped,
    }
}
