use std::sync::LazyLock;

use regex::Regex;

use crate::linter::issues::{Issue, IssueKind};
use crate::linter::rules::{AltRule, ImageTag};

// Also matches descriptive text ending in "image" ("Stock image").
static POOR_ALT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\.png|\.jpg|\.jpeg|\.gif|\.svg|image)$").expect("valid poor-alt pattern")
});

/// Alt text that looks like a file name or just says "image".
pub fn is_poor_alt(alt: &str) -> bool {
    POOR_ALT.is_match(alt.trim())
}

pub struct PoorAltRule;

impl AltRule for PoorAltRule {
    fn name(&self) -> &str {
        "poor-alt"
    }

    fn check(&self, tag: &ImageTag<'_>) -> Option<Issue> {
        let alt = tag.alt?.trim();
        if alt.is_empty() || !is_poor_alt(alt) {
            return None;
        }

        Some(Issue::warning(
            tag,
            IssueKind::PoorAlt,
            format!(
                "Poor alt text: \"{}\" may not describe the image's purpose.",
                alt
            ),
        ))
    }
}
