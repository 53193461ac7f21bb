pub mod issues;
pub mod rules;
pub mod runner;

pub use issues::{Issue, IssueKind, Severity};
pub use rules::{AltRule, ImageTag, RuleRegistry};
pub use runner::LintRunner;

use crate::config::SupportedTags;
use crate::dialect::Dialect;
use crate::scanner::TagEvent;

/// Classify scanner events into alt text issues, ordered by line.
pub fn classify<I>(events: I, dialect: Dialect, supported_tags: &SupportedTags) -> Vec<Issue>
where
    I: IntoIterator<Item = TagEvent>,
{
    let runner = LintRunner::new(default_registry());
    runner.run(events, dialect, supported_tags)
}

/// Create the default rule registry, highest priority first.
fn default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(Box::new(rules::missing_alt::MissingAltRule));
    registry.register(Box::new(rules::empty_alt::EmptyAltRule));
    registry.register(Box::new(rules::poor_alt::PoorAltRule));
    registry
}
