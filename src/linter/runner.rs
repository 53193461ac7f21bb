use crate::config::SupportedTags;
use crate::dialect::Dialect;
use crate::linter::issues::Issue;
use crate::linter::rules::{ImageTag, RuleRegistry};
use crate::scanner::TagEvent;

pub struct LintRunner {
    registry: RuleRegistry,
}

impl LintRunner {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// Classify every supported tag in `events`. At most one issue is
    /// reported per tag: the first registered rule that fires.
    pub fn run<I>(&self, events: I, dialect: Dialect, supported_tags: &SupportedTags) -> Vec<Issue>
    where
        I: IntoIterator<Item = TagEvent>,
    {
        let mut issues = Vec::new();
        let mut checked = 0usize;

        for event in events {
            if !supported_tags.contains(&event.name) {
                continue;
            }
            checked += 1;

            let tag = ImageTag::resolve(&event, dialect);
            if let Some(issue) = self
                .registry
                .rules()
                .iter()
                .find_map(|rule| rule.check(&tag))
            {
                log::debug!(
                    "<{}> at line {}: {}",
                    event.name,
                    event.line,
                    issue.code()
                );
                issues.push(issue);
            }
        }

        log::debug!(
            "Checked {} image tag(s), found {} issue(s)",
            checked,
            issues.len()
        );

        issues.sort_by_key(|issue| issue.line);
        issues
    }
}
