//! Block splitter for Vue single-file components.
//!
//! A component file is a sequence of top-level blocks:
//! `<template>`, `<script>` (optionally `<script setup>`), any number of
//! `<style>` blocks and arbitrary custom blocks (`<i18n>`, `<docs>`, ...).
//! Only block boundaries are located here; block contents are returned as
//! slices of the source.

use std::ops::Range;

use crate::scanner::{self, Attributes, find_close_tag, is_tag_name_byte};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock<'a> {
    pub tag: String,
    pub attributes: Attributes,
    /// Text between the open and close tags
    pub content: &'a str,
    pub content_range: Range<usize>,
    /// 0-based line of the first content byte
    pub start_line: usize,
}

impl SfcBlock<'_> {
    pub fn lang(&self) -> Option<&str> {
        self.attributes.get_ignore_case("lang")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfcDescriptor<'a> {
    pub template: Option<SfcBlock<'a>>,
    pub script: Option<SfcBlock<'a>>,
    pub script_setup: Option<SfcBlock<'a>>,
    pub styles: Vec<SfcBlock<'a>>,
    pub custom_blocks: Vec<SfcBlock<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SfcError {
    /// A block was opened but its close tag is missing
    UnclosedBlock(String),
    /// A block that may appear only once appeared again
    DuplicateBlock(String),
    /// A top-level tag starting at this byte offset never closes
    MalformedTag(usize),
}

impl std::fmt::Display for SfcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnclosedBlock(tag) => write!(f, "<{}> block is never closed", tag),
            Self::DuplicateBlock(tag) => {
                write!(f, "single file component contains more than one <{}>", tag)
            }
            Self::MalformedTag(offset) => write!(f, "malformed top-level tag at byte {}", offset),
        }
    }
}

impl std::error::Error for SfcError {}

pub fn parse_sfc(source: &str) -> Result<SfcDescriptor<'_>, SfcError> {
    let bytes = source.as_bytes();
    let mut descriptor = SfcDescriptor::default();
    let mut i = 0;

    while let Some(rel) = bytes[i..].iter().position(|&b| b == b'<') {
        let lt = i + rel;
        let rest = &bytes[lt..];

        if rest.starts_with(b"<!--") {
            let end = rest
                .windows(3)
                .position(|w| w == b"-->")
                .ok_or(SfcError::MalformedTag(lt))?;
            i = lt + end + 3;
            continue;
        }

        if rest.len() < 2 || !rest[1].is_ascii_alphabetic() {
            i = lt + 1;
            continue;
        }

        let tag_end = find_open_tag_end(bytes, lt).ok_or(SfcError::MalformedTag(lt))?;
        let mut name_end = lt + 1;
        while name_end < tag_end && is_tag_name_byte(bytes[name_end]) {
            name_end += 1;
        }
        let tag = source[lt + 1..name_end].to_ascii_lowercase();
        let attributes = scanner::scan(&source[lt..=tag_end], false)
            .next()
            .map(|event| event.attributes)
            .unwrap_or_default();

        let content_start = tag_end + 1;
        let self_closing = bytes[tag_end - 1] == b'/';
        let (content_end, next) = if self_closing {
            (content_start, content_start)
        } else {
            let close = if tag == "template" {
                find_template_close(bytes, content_start)
            } else {
                find_close_tag(&bytes[content_start..], tag.as_bytes())
                    .map(|rel| content_start + rel)
            }
            .ok_or_else(|| SfcError::UnclosedBlock(tag.clone()))?;
            let close_end = bytes[close..]
                .iter()
                .position(|&b| b == b'>')
                .ok_or(SfcError::MalformedTag(close))?;
            (close, close + close_end + 1)
        };

        let block = SfcBlock {
            start_line: bytes[..content_start].iter().filter(|&&b| b == b'\n').count(),
            content: &source[content_start..content_end],
            content_range: content_start..content_end,
            attributes,
            tag,
        };

        match block.tag.as_str() {
            "template" => set_once(&mut descriptor.template, block)?,
            "script" if block.attributes.contains_ignore_case("setup") => {
                set_once(&mut descriptor.script_setup, block)?
            }
            "script" => set_once(&mut descriptor.script, block)?,
            "style" => descriptor.styles.push(block),
            _ => descriptor.custom_blocks.push(block),
        }

        i = next;
    }

    Ok(descriptor)
}

fn set_once<'a>(slot: &mut Option<SfcBlock<'a>>, block: SfcBlock<'a>) -> Result<(), SfcError> {
    if slot.is_some() {
        return Err(SfcError::DuplicateBlock(block.tag));
    }
    *slot = Some(block);
    Ok(())
}

/// Index of the `>` ending the open tag at `lt`, skipping quoted values.
fn find_open_tag_end(bytes: &[u8], lt: usize) -> Option<usize> {
    let mut i = lt + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i),
            quote @ (b'"' | b'\'') => {
                i += 1 + bytes[i + 1..].iter().position(|&b| b == quote)?;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn starts_with_tag(bytes: &[u8], at: usize, prefix: &[u8]) -> bool {
    let end = at + prefix.len();
    end <= bytes.len()
        && bytes[at..end].eq_ignore_ascii_case(prefix)
        && bytes.get(end).is_none_or(|&b| !is_tag_name_byte(b))
}

/// Find the `</template>` matching a root `<template>`, accounting for nested
/// `<template>` elements (slots, `v-if` groups).
fn find_template_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = from;

    while let Some(rel) = bytes[i..].iter().position(|&b| b == b'<') {
        i += rel;
        if starts_with_tag(bytes, i, b"</template") {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        } else if starts_with_tag(bytes, i, b"<template")
            && let Some(end) = find_open_tag_end(bytes, i)
            && bytes[end - 1] != b'/'
        {
            depth += 1;
        }
        i += 1;
    }

    None
}
