use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use globset::GlobSet;
use rayon::prelude::*;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use altfix::linter::Severity;
use altfix::{Config, Dialect, Issue, rewriter};

mod cli;
use cli::{Cli, Commands, MessageFormat};

/// A document to lint: a file on disk or stdin.
struct Source {
    path: Option<PathBuf>,
    text: String,
    dialect: Dialect,
}

impl Source {
    fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string())
    }
}

struct Report {
    source: Source,
    issues: Vec<Issue>,
}

#[derive(Serialize)]
struct Location {
    row: usize,
    column: usize,
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    path: String,
    location: Location,
    #[serde(flatten)]
    issue: &'a Issue,
    suggestion: Option<String>,
}

fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn parse_language(id: &str) -> io::Result<Dialect> {
    Dialect::from_language_id(id).ok_or_else(|| {
        invalid_input(format!(
            "Unknown language '{}'. Expected html, javascriptreact, typescriptreact, vue, svelte or astro",
            id
        ))
    })
}

fn read_stdin() -> io::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn start_dir_for(path: Option<&Path>) -> io::Result<PathBuf> {
    match path {
        Some(p) if p.is_dir() => Ok(p.to_path_buf()),
        Some(p) => Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf()),
        None => std::env::current_dir(),
    }
}

fn load_config(explicit: Option<&Path>, input: Option<&Path>) -> io::Result<Config> {
    let start_dir = start_dir_for(input)?;
    let (cfg, cfg_path) = altfix::config::load(explicit, &start_dir)?;

    if let Some(path) = &cfg_path {
        log::debug!("Using config from: {}", path.display());
    } else {
        log::debug!("Using default config");
    }

    Ok(cfg)
}

/// Expand directories into the supported files below them. Explicit file
/// arguments are kept even when excluded.
fn collect_files(
    paths: &[PathBuf],
    exclude: &GlobSet,
    language: Option<Dialect>,
) -> io::Result<Vec<(PathBuf, Dialect)>> {
    let mut files = Vec::new();

    for root in paths {
        if root.is_file() {
            let dialect = language
                .or_else(|| Dialect::from_path(root))
                .ok_or_else(|| {
                    invalid_input(format!(
                        "Cannot infer language of {}; pass --language",
                        root.display()
                    ))
                })?;
            files.push((root.clone(), dialect));
            continue;
        }
        if !root.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: No such file or directory", root.display()),
            ));
        }

        let mut found = Vec::new();
        for entry in ignore::WalkBuilder::new(root).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if exclude.is_match(relative) {
                log::debug!("Excluded: {}", path.display());
                continue;
            }
            if let Some(dialect) = Dialect::from_path(path) {
                found.push((path.to_path_buf(), dialect));
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0));
        files.extend(found);
    }

    Ok(files)
}

fn lint_sources(sources: Vec<Source>, cfg: &Config) -> Vec<Report> {
    sources
        .into_par_iter()
        .map(|source| {
            let issues = altfix::check(&source.text, source.dialect, cfg);
            Report { source, issues }
        })
        .collect()
}

fn read_sources(files: Vec<(PathBuf, Dialect)>) -> Vec<Source> {
    files
        .into_par_iter()
        .filter_map(|(path, dialect)| match fs::read_to_string(&path) {
            Ok(text) => Some(Source {
                path: Some(path),
                text,
                dialect,
            }),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

/// 1-based row and column (in characters) of a byte offset.
fn location(text: &str, line: usize, offset: usize) -> Location {
    let offset = offset.min(text.len());
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    Location {
        row: line + 1,
        column: text[line_start..offset].chars().count() + 1,
    }
}

fn print_diagnostics(reports: &[Report]) {
    let mut total = 0;

    for report in reports {
        let file_name = report.source.display_name();

        for issue in &report.issues {
            let severity_str = match issue.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",     // red
                Severity::Warning => "\x1b[33mwarning\x1b[0m", // yellow
            };
            let loc = location(&report.source.text, issue.line, issue.offset);

            println!(
                "{severity_str}[{}]: {} at {}:{}:{}",
                issue.code(),
                issue.message,
                file_name,
                loc.row,
                loc.column
            );

            match issue.suggested_alt() {
                Some(suggestion) => println!("  \x1b[36mhelp\x1b[0m: add alt text \"{}\"", suggestion),
                None => println!("  \x1b[36mhelp\x1b[0m: add alt text describing the image"),
            }
            total += 1;
        }
    }

    println!("\nFound {} issue(s)", total);
}

fn print_json(reports: &[Report]) -> io::Result<()> {
    let issues: Vec<JsonIssue<'_>> = reports
        .iter()
        .flat_map(|report| {
            report.issues.iter().map(|issue| JsonIssue {
                path: report.source.display_name(),
                location: location(&report.source.text, issue.line, issue.offset),
                issue,
                suggestion: issue.suggested_alt(),
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&issues).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

fn print_diff(file_path: &str, original: &str, fixed: &str) {
    let diff = TextDiff::from_lines(original, fixed);

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!("---");
        }

        println!("Diff in {}:{}:", file_path, group[0].old_range().start + 1);

        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, style) = match change.tag() {
                    ChangeTag::Delete => ("-", "\x1b[31m"), // red
                    ChangeTag::Insert => ("+", "\x1b[32m"), // green
                    ChangeTag::Equal => (" ", "\x1b[0m"),   // normal
                };

                print!("{}{}{}", style, sign, change.value());

                // Reset color at end of line if it was colored
                if change.tag() != ChangeTag::Equal {
                    print!("\x1b[0m");
                }
            }
        }
    }
}

/// Apply suggestions to every source; returns the sources as fixed.
fn fix_sources(sources: Vec<Source>, cfg: &Config, diff: bool) -> io::Result<Vec<Source>> {
    let mut fixed_sources = Vec::with_capacity(sources.len());
    let mut total_fixed = 0;

    for source in sources {
        let outcome = rewriter::fix_document(&source.text, source.dialect, cfg);
        total_fixed += outcome.fixed;

        if outcome.fixed > 0 {
            match &source.path {
                Some(path) if diff => {
                    print_diff(&path.display().to_string(), &source.text, &outcome.output)
                }
                Some(path) => {
                    fs::write(path, &outcome.output)?;
                    println!("Fixed {} issue(s) in {}", outcome.fixed, path.display());
                }
                None => {}
            }
        }
        if source.path.is_none() {
            if diff {
                print_diff("<stdin>", &source.text, &outcome.output);
            } else {
                print!("{}", outcome.output);
            }
        }
        if outcome.skipped > 0 {
            log::info!(
                "{}: {} issue(s) need manual alt text",
                source.display_name(),
                outcome.skipped
            );
        }

        fixed_sources.push(Source {
            text: if diff { source.text } else { outcome.output },
            ..source
        });
    }

    eprintln!("Fixed {} issue(s)", total_fixed);
    Ok(fixed_sources)
}

fn lint(
    cli_config: Option<&Path>,
    paths: Vec<PathBuf>,
    language: Option<String>,
    check: bool,
    fix: bool,
    diff: bool,
    message_format: MessageFormat,
) -> io::Result<i32> {
    let language = language.as_deref().map(parse_language).transpose()?;
    let cfg = load_config(cli_config, paths.first().map(PathBuf::as_path))?;

    let mut sources = if paths.is_empty() {
        vec![Source {
            path: None,
            text: read_stdin()?,
            dialect: language.unwrap_or(Dialect::Html),
        }]
    } else {
        let files = collect_files(&paths, &cfg.exclude_set(), language)?;
        log::debug!("Linting {} file(s)", files.len());
        read_sources(files)
    };

    let stdin_fixed = fix && paths.is_empty() && !diff;
    if fix {
        sources = fix_sources(sources, &cfg, diff)?;
    }

    let reports = lint_sources(sources, &cfg);
    let has_issues = reports.iter().any(|r| !r.issues.is_empty());

    // Fixed stdin text already went to stdout
    if !stdin_fixed {
        match message_format {
            MessageFormat::Text if has_issues => print_diagnostics(&reports),
            MessageFormat::Text => {
                if !check {
                    println!("No issues found");
                }
            }
            MessageFormat::Json => print_json(&reports)?,
        }
    }

    Ok(if check && has_issues { 1 } else { 0 })
}

fn fix_line(
    cli_config: Option<&Path>,
    file: PathBuf,
    line: usize,
    alt: String,
    tag: Option<String>,
    language: Option<String>,
    stdout: bool,
) -> io::Result<i32> {
    let dialect = match language.as_deref() {
        Some(id) => parse_language(id)?,
        None => Dialect::from_path(&file).ok_or_else(|| {
            invalid_input(format!(
                "Cannot infer language of {}; pass --language",
                file.display()
            ))
        })?,
    };
    if line == 0 {
        return Err(invalid_input(
            "Line numbers must be 1-indexed (start from 1)".to_string(),
        ));
    }

    let cfg = load_config(cli_config, Some(&file))?;
    let text = fs::read_to_string(&file)?;
    let index = line - 1;

    let current = rewriter::line_text(&text, index).ok_or_else(|| {
        invalid_input(format!("{} has no line {}", file.display(), line))
    })?;
    let tag = tag.unwrap_or_else(|| rewriter::target_tag(current, &cfg.supported_tags()));
    let rewritten = rewriter::rewrite(current, &tag, &alt, dialect.self_closing_syntax());

    if rewritten == current {
        eprintln!("No <{}> tag found on line {}", tag, line);
        return Ok(1);
    }

    let output = rewriter::replace_line(&text, index, &rewritten)
        .ok_or_else(|| invalid_input(format!("{} has no line {}", file.display(), line)))?;

    if stdout {
        print!("{}", output);
    } else {
        fs::write(&file, &output)?;
        println!("Fixed {}:{}", file.display(), line);
    }

    Ok(0)
}

fn scan(file: Option<PathBuf>, language: Option<String>) -> io::Result<i32> {
    let dialect = match (language.as_deref(), &file) {
        (Some(id), _) => parse_language(id)?,
        (None, Some(path)) => Dialect::from_path(path).unwrap_or(Dialect::Html),
        (None, None) => Dialect::Html,
    };

    let text = match &file {
        Some(path) => fs::read_to_string(path)?,
        None => read_stdin()?,
    };

    let input = altfix::dialect::resolve_scan_input(&text, dialect);
    let mut scanner = altfix::scanner::scan(input.scan_text, input.xml_mode);

    for event in scanner.by_ref() {
        let loc = location(
            &text,
            event.line + input.line_offset,
            event.offset + input.byte_offset,
        );
        let attributes: Vec<String> = event
            .attributes
            .iter()
            .map(|(name, value)| format!("{}={:?}", name, value))
            .collect();
        println!(
            "{}:{} <{}> {}",
            loc.row,
            loc.column,
            event.name,
            attributes.join(" ")
        );
    }

    if let Some(fault) = scanner.fault() {
        eprintln!("warning: scan stopped early: {}", fault);
    }

    Ok(0)
}

fn run(cli: Cli) -> io::Result<i32> {
    match cli.command {
        Commands::Lint {
            paths,
            language,
            check,
            fix,
            diff,
            message_format,
        } => lint(
            cli.config.as_deref(),
            paths,
            language,
            check,
            fix,
            diff,
            message_format,
        ),
        Commands::Fix {
            file,
            line,
            alt,
            tag,
            language,
            stdout,
        } => fix_line(cli.config.as_deref(), file, line, alt, tag, language, stdout),
        Commands::Scan { file, language } => scan(file, language),
        #[cfg(feature = "lsp")]
        Commands::Lsp => {
            // LSP needs tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async { altfix::lsp::run().await })?;
            Ok(0)
        }
        #[cfg(not(feature = "lsp"))]
        Commands::Lsp => Err(io::Error::other(
            "altfix was built without the lsp feature",
        )),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
