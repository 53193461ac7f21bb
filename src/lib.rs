pub mod config;
pub mod dialect;
pub mod linter;
#[cfg(feature = "lsp")]
pub mod lsp;
pub mod rewriter;
pub mod scanner;

pub use config::Config;
pub use config::ConfigBuilder;
pub use dialect::Dialect;
pub use linter::Issue;
pub use rewriter::rewrite;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Finds image tags with missing, empty or poor alt text.
///
/// Lines and offsets in the returned issues refer to `text` itself, also for
/// Vue components where only the template block is scanned.
///
/// # Examples
///
/// ```rust
/// use altfix::{Config, Dialect};
///
/// let issues = altfix::check("<img src=\"logo.png\">", Dialect::Html, &Config::default());
/// assert_eq!(issues[0].code(), "missing-alt");
/// ```
pub fn check(text: &str, dialect: Dialect, config: &Config) -> Vec<Issue> {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    let input = dialect::resolve_scan_input(text, dialect);
    if input.scan_text.is_empty() {
        return Vec::new();
    }

    let events = scanner::scan(input.scan_text, input.xml_mode);
    let mut issues = linter::classify(events, dialect, &config.supported_tags());
    for issue in &mut issues {
        issue.line += input.line_offset;
        issue.offset += input.byte_offset;
    }

    log::debug!("{} issue(s) in {} document", issues.len(), dialect);
    issues
}
