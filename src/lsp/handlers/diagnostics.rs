use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::*;

use crate::lsp::DocumentState;

use super::super::conversions::issue_to_diagnostic;
use super::super::helpers::{get_config, get_document};

/// Scan the document and publish its alt text diagnostics
pub(crate) async fn lint_and_publish(
    client: &Client,
    document_map: &Arc<Mutex<HashMap<String, DocumentState>>>,
    workspace_root: &Arc<Mutex<Option<PathBuf>>>,
    uri: Uri,
) {
    let Some(doc_state) = get_document(document_map, &uri).await else {
        client
            .log_message(
                MessageType::WARNING,
                format!("Document not found: {}", uri.as_str()),
            )
            .await;
        return;
    };

    let Some(dialect) = doc_state.dialect else {
        client.publish_diagnostics(uri, vec![], None).await;
        return;
    };

    let config = get_config(client, workspace_root).await;

    let text = doc_state.text;
    let text_clone = text.clone();
    let issues =
        tokio::task::spawn_blocking(move || crate::check(&text_clone, dialect, &config)).await;

    match issues {
        Ok(issues) => {
            let diagnostics: Vec<Diagnostic> = issues
                .iter()
                .map(|issue| issue_to_diagnostic(issue, &text))
                .collect();

            client.publish_diagnostics(uri, diagnostics, None).await;
        }
        Err(e) => {
            client
                .log_message(MessageType::ERROR, format!("Linting task failed: {}", e))
                .await;
        }
    }
}
