//! Language server publishing alt text diagnostics and quick fixes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_lsp_server::{Client, LspService, Server};

use crate::Dialect;

mod config;
mod conversions;
mod documents;
mod handlers;
mod helpers;
mod server;

/// Command the client runs (after prompting for text) to apply a custom fix.
pub const APPLY_CUSTOM_FIX_COMMAND: &str = "altfix.applyCustomFix";

/// Diagnostic source reported to the editor.
pub const DIAGNOSTIC_SOURCE: &str = "altfix";

#[derive(Debug, Clone)]
pub struct DocumentState {
    pub text: String,
    /// Dialect from the client's language id; `None` for unsupported languages
    pub dialect: Option<Dialect>,
}

pub struct AltfixLsp {
    client: Client,
    // Use String keys since Uri doesn't implement Send
    document_map: Arc<Mutex<HashMap<String, DocumentState>>>,
    workspace_root: Arc<Mutex<Option<PathBuf>>>,
}

impl AltfixLsp {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            document_map: Arc::new(Mutex::new(HashMap::new())),
            workspace_root: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared handle to the open documents.
    pub fn document_map(&self) -> Arc<Mutex<HashMap<String, DocumentState>>> {
        Arc::clone(&self.document_map)
    }
}

pub async fn run() -> std::io::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(AltfixLsp::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
