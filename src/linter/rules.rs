use crate::dialect::Dialect;
use crate::linter::issues::Issue;
use crate::scanner::TagEvent;

pub mod empty_alt;
pub mod missing_alt;
pub mod poor_alt;

/// A supported tag occurrence with its alt/src attributes resolved.
#[derive(Debug, Clone)]
pub struct ImageTag<'a> {
    pub event: &'a TagEvent,
    pub dialect: Dialect,
    /// `alt` value, `None` when the attribute is absent
    pub alt: Option<&'a str>,
    /// `src` value as written, falling back to `:src`; empty when absent
    pub src: &'a str,
    pub file_name_guess: String,
    pub base_name_guess: String,
}

impl<'a> ImageTag<'a> {
    pub fn resolve(event: &'a TagEvent, dialect: Dialect) -> Self {
        let attributes = &event.attributes;
        let alt = attributes.get_ignore_case("alt");

        let (src, path) = match attributes.get_ignore_case("src") {
            Some(src) if dialect.has_expression_values() && src.trim_start().starts_with('{') => {
                (src, "")
            }
            Some(src) => (src, src),
            None => match attributes.get_ignore_case(":src") {
                Some(bound) => (bound, string_literal(bound).unwrap_or("")),
                None => ("", ""),
            },
        };

        let file_name_guess = file_name_guess(path);
        let base_name_guess = base_name_guess(&file_name_guess);

        Self {
            event,
            dialect,
            alt,
            src,
            file_name_guess,
            base_name_guess,
        }
    }
}

/// Contents of a quoted string literal expression such as `'/img/a.png'`.
fn string_literal(expr: &str) -> Option<&str> {
    let expr = expr.trim();
    let quote = expr.chars().next()?;
    if !matches!(quote, '\'' | '"' | '`') || expr.len() < 2 || !expr.ends_with(quote) {
        return None;
    }
    let inner = &expr[1..expr.len() - 1];
    (!inner.contains(quote) && !inner.contains("${")).then_some(inner)
}

/// Last path segment of `src` without its query string; `"image"` if empty.
pub fn file_name_guess(src: &str) -> String {
    let path = src.split('?').next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or_default().trim();
    if name.is_empty() {
        "image".to_string()
    } else {
        name.to_string()
    }
}

/// Part of the file name before the first `.`; the whole name when that
/// part is empty (dot files).
pub fn base_name_guess(file_name: &str) -> String {
    match file_name.split('.').next() {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => file_name.to_string(),
    }
}

pub trait AltRule: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, tag: &ImageTag<'_>) -> Option<Issue>;
}

/// Rules in priority order; the first rule that reports wins.
pub struct RuleRegistry {
    rules: Vec<Box<dyn AltRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: Box<dyn AltRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn AltRule>] {
        &self.rules
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
