//! Markup dialects and how each one is fed to the scanner.

pub mod sfc;

use std::path::Path;

use serde::Serialize;

pub use sfc::{SfcBlock, SfcDescriptor, SfcError, parse_sfc};

/// The markup convention a file is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Classic HTML documents
    Html,
    /// JSX / TSX: markup inside a programming language with `{...}` props
    ComponentSyntax,
    /// Vue single-file components; only the `<template>` block is scanned
    Vue,
    Svelte,
    Astro,
}

impl Dialect {
    /// Resolve an editor language identifier (`typescriptreact`, `vue`, ...).
    pub fn from_language_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "javascriptreact" | "typescriptreact" | "jsx" | "tsx" => Some(Self::ComponentSyntax),
            "vue" => Some(Self::Vue),
            "svelte" => Some(Self::Svelte),
            "astro" => Some(Self::Astro),
            _ => None,
        }
    }

    /// Resolve from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_language_id(ext)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::ComponentSyntax => "jsx",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::Astro => "astro",
        }
    }

    pub fn is_component_syntax(self) -> bool {
        self == Self::ComponentSyntax
    }

    /// Whether attribute values may be bound expressions rather than strings.
    pub fn has_expression_values(self) -> bool {
        !matches!(self, Self::Html)
    }

    /// Messages call the attribute a "prop" in component-based dialects.
    pub fn attribute_noun(self) -> &'static str {
        match self {
            Self::Html => "attribute",
            _ => "prop",
        }
    }

    pub fn xml_mode(self) -> bool {
        matches!(self, Self::ComponentSyntax | Self::Svelte | Self::Astro)
    }

    /// Rewritten tags end in ` />`.
    pub fn self_closing_syntax(self) -> bool {
        self.is_component_syntax()
    }

    /// Template dialects get an extra "translation placeholder" quick fix.
    pub fn supports_translation_placeholder(self) -> bool {
        matches!(self, Self::Vue | Self::Svelte | Self::Astro)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What to scan for a document, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInput<'a> {
    pub scan_text: &'a str,
    pub xml_mode: bool,
    pub self_closing_syntax: bool,
    /// Line in the full document where `scan_text` starts
    pub line_offset: usize,
    /// Byte offset in the full document where `scan_text` starts
    pub byte_offset: usize,
}

/// Pick the scannable text and scanner mode for `dialect`.
///
/// For Vue this is the template block. Extraction problems are not errors:
/// the result is an empty scan input and therefore no issues.
pub fn resolve_scan_input(full_text: &str, dialect: Dialect) -> ScanInput<'_> {
    let mut input = ScanInput {
        scan_text: full_text,
        xml_mode: dialect.xml_mode(),
        self_closing_syntax: dialect.self_closing_syntax(),
        line_offset: 0,
        byte_offset: 0,
    };

    if dialect == Dialect::Vue {
        input.scan_text = "";
        match parse_sfc(full_text) {
            Ok(descriptor) => match descriptor.template {
                Some(template) if is_markup_template(&template) => {
                    input.scan_text = template.content;
                    input.line_offset = template.start_line;
                    input.byte_offset = template.content_range.start;
                }
                Some(template) => {
                    log::debug!(
                        "Skipping non-HTML template (lang={:?}, src={:?})",
                        template.lang(),
                        template.attributes.get("src")
                    );
                }
                None => log::debug!("Component has no <template> block"),
            },
            Err(e) => log::debug!("Template extraction failed: {}", e),
        }
    }

    input
}

fn is_markup_template(template: &SfcBlock<'_>) -> bool {
    template.attributes.get("src").is_none()
        && template
            .lang()
            .is_none_or(|lang| lang.eq_ignore_ascii_case("html"))
}
