//! CLI integration tests for altfix.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (lint, fix, scan, lsp)
//! - Stdin/stdout handling
//! - Exit codes
//! - File I/O operations

mod common;
mod lint;
mod scan;

#[cfg(feature = "lsp")]
mod lsp;
