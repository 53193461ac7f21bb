use tower_lsp_server::ls_types::*;

use crate::linter::{Issue, Severity};

use super::DIAGNOSTIC_SOURCE;

/// Lines of `text` with their line endings (`\n` or `\r\n`) stripped.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        (start, line.strip_suffix('\r').unwrap_or(line))
    })
}

fn utf16_len(s: &str) -> u32 {
    s.chars().map(|c| c.len_utf16()).sum::<usize>() as u32
}

/// Helper to convert LSP UTF-16 position to byte offset in UTF-8 string
pub(crate) fn position_to_offset(text: &str, position: Position) -> Option<usize> {
    let (start, line) = lines(text).nth(position.line as usize)?;

    // LSP uses UTF-16 code units, Rust uses UTF-8 bytes
    let mut utf16_offset = 0;
    for (byte_idx, ch) in line.char_indices() {
        if utf16_offset >= position.character as usize {
            return Some(start + byte_idx);
        }
        utf16_offset += ch.len_utf16();
    }

    // Position is at or past end of line
    Some(start + line.len())
}

/// Range covering a whole 0-based line, excluding its line ending.
pub(crate) fn line_range(text: &str, line: usize) -> Range {
    let end = lines(text)
        .nth(line)
        .map(|(_, l)| utf16_len(l))
        .unwrap_or(0);

    Range {
        start: Position {
            line: line as u32,
            character: 0,
        },
        end: Position {
            line: line as u32,
            character: end,
        },
    }
}

/// Convert an alt text issue to an LSP diagnostic spanning its line
pub(crate) fn issue_to_diagnostic(issue: &Issue, text: &str) -> Diagnostic {
    let severity = match issue.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic {
        range: line_range(text, issue.line),
        severity: Some(severity),
        code: Some(NumberOrString::String(issue.code().to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: issue.message.clone(),
        ..Default::default()
    }
}

/// Apply a single content change to text
pub(crate) fn apply_content_change(text: &str, change: &TextDocumentContentChangeEvent) -> String {
    match &change.range {
        Some(range) => {
            // Incremental edit with range
            let start_offset = position_to_offset(text, range.start).unwrap_or(text.len());
            let end_offset = position_to_offset(text, range.end)
                .unwrap_or(text.len())
                .max(start_offset);

            let mut result =
                String::with_capacity(text.len() - (end_offset - start_offset) + change.text.len());
            result.push_str(&text[..start_offset]);
            result.push_str(&change.text);
            result.push_str(&text[end_offset..]);
            result
        }
        None => {
            // Full document update
            change.text.clone()
        }
    }
}
