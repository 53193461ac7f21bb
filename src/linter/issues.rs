use serde::Serialize;

use crate::linter::rules::ImageTag;
use crate::linter::rules::poor_alt::is_poor_alt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    #[serde(rename = "missing-alt")]
    MissingAlt,
    #[serde(rename = "empty-alt")]
    EmptyAlt,
    #[serde(rename = "poor-alt")]
    PoorAlt,
}

impl IssueKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingAlt => "missing-alt",
            Self::EmptyAlt => "empty-alt",
            Self::PoorAlt => "poor-alt",
        }
    }
}

/// One flagged image tag. Recomputed on every scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// 0-based line of the tag
    pub line: usize,
    /// Byte offset of the tag's `<`
    pub offset: usize,
    pub severity: Severity,
    #[serde(rename = "code")]
    pub kind: IssueKind,
    pub message: String,
    pub tag_name: String,
    /// The `src` (or `:src`) value as written; empty if absent
    pub source_attr: String,
    pub file_name_guess: String,
    pub base_name_guess: String,
    pub is_component_syntax: bool,
}

impl Issue {
    fn new(tag: &ImageTag<'_>, severity: Severity, kind: IssueKind, message: String) -> Self {
        Self {
            line: tag.event.line,
            offset: tag.event.offset,
            severity,
            kind,
            message,
            tag_name: tag.event.name.clone(),
            source_attr: tag.src.to_string(),
            file_name_guess: tag.file_name_guess.clone(),
            base_name_guess: tag.base_name_guess.clone(),
            is_component_syntax: tag.dialect.is_component_syntax(),
        }
    }

    pub fn error(tag: &ImageTag<'_>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(tag, Severity::Error, kind, message.into())
    }

    pub fn warning(tag: &ImageTag<'_>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(tag, Severity::Warning, kind, message.into())
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Readable alt text derived from the image file name, e.g.
    /// `company-logo.png` becomes `Company logo`. `None` when the result
    /// would itself read as poor alt text.
    pub fn suggested_alt(&self) -> Option<String> {
        let words: Vec<String> = self
            .base_name_guess
            .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        let joined = words.join(" ");
        let mut chars = joined.chars();
        let suggestion: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => return None,
        };

        if is_poor_alt(&suggestion) || !suggestion.chars().any(char::is_alphabetic) {
            return None;
        }
        Some(suggestion)
    }
}
