use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::*;

use super::DocumentState;
use super::conversions::apply_content_change;
use super::handlers::diagnostics::lint_and_publish;
use crate::Dialect;

/// Dialect from the client's language id, else from the file extension.
fn detect_dialect(language_id: &str, uri: &Uri) -> Option<Dialect> {
    Dialect::from_language_id(language_id)
        .or_else(|| uri.to_file_path().and_then(|path| Dialect::from_path(&path)))
}

/// Handle textDocument/didOpen notification
pub(crate) async fn did_open(
    client: &Client,
    document_map: Arc<Mutex<HashMap<String, DocumentState>>>,
    workspace_root: Arc<Mutex<Option<std::path::PathBuf>>>,
    params: DidOpenTextDocumentParams,
) {
    let uri = params.text_document.uri.to_string();
    let dialect = detect_dialect(&params.text_document.language_id, &params.text_document.uri);

    document_map.lock().await.insert(
        uri.clone(),
        DocumentState {
            text: params.text_document.text,
            dialect,
        },
    );

    log::debug!("Opened document: {} ({:?})", uri, dialect);

    lint_and_publish(
        client,
        &document_map,
        &workspace_root,
        params.text_document.uri,
    )
    .await;
}

/// Handle textDocument/didChange notification
pub(crate) async fn did_change(
    document_map: Arc<Mutex<HashMap<String, DocumentState>>>,
    workspace_root: Arc<Mutex<Option<std::path::PathBuf>>>,
    client: &Client,
    params: DidChangeTextDocumentParams,
) {
    let uri_string = params.text_document.uri.to_string();

    // Apply incremental changes sequentially
    {
        let mut document_map = document_map.lock().await;
        let Some(doc_state) = document_map.get_mut(&uri_string) else {
            return;
        };
        for change in params.content_changes {
            doc_state.text = apply_content_change(&doc_state.text, &change);
        }
    }

    lint_and_publish(
        client,
        &document_map,
        &workspace_root,
        params.text_document.uri,
    )
    .await;
}

/// Handle textDocument/didClose notification
pub(crate) async fn did_close(
    client: &Client,
    document_map: Arc<Mutex<HashMap<String, DocumentState>>>,
    params: DidCloseTextDocumentParams,
) {
    let uri = params.text_document.uri.to_string();
    document_map.lock().await.remove(&uri);

    // Clear diagnostics
    client
        .publish_diagnostics(params.text_document.uri, vec![], None)
        .await;
}
