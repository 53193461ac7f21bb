use crate::linter::issues::{Issue, IssueKind};
use crate::linter::rules::{AltRule, ImageTag};

pub struct MissingAltRule;

impl AltRule for MissingAltRule {
    fn name(&self) -> &str {
        "missing-alt"
    }

    fn check(&self, tag: &ImageTag<'_>) -> Option<Issue> {
        if tag.alt.is_some() {
            return None;
        }

        Some(Issue::error(
            tag,
            IssueKind::MissingAlt,
            format!(
                "Missing alt {} for {} tag.",
                tag.dialect.attribute_noun(),
                tag.event.name
            ),
        ))
    }
}
