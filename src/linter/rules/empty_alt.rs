use crate::linter::issues::{Issue, IssueKind};
use crate::linter::rules::{AltRule, ImageTag};

pub struct EmptyAltRule;

impl AltRule for EmptyAltRule {
    fn name(&self) -> &str {
        "empty-alt"
    }

    fn check(&self, tag: &ImageTag<'_>) -> Option<Issue> {
        let alt = tag.alt?.trim();
        let empty_expression = tag.dialect.is_component_syntax() && alt == "{}";
        if !alt.is_empty() && !empty_expression {
            return None;
        }

        Some(Issue::warning(
            tag,
            IssueKind::EmptyAlt,
            format!(
                "Empty alt {} for {} tag.",
                tag.dialect.attribute_noun(),
                tag.event.name
            ),
        ))
    }
}
