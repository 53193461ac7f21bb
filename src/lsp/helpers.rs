use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_lsp_server::ls_types::Uri;

use crate::Config;

use super::DocumentState;
use super::config::load_config;

/// Helper to get document state from the document map
pub(crate) async fn get_document(
    document_map: &Arc<Mutex<HashMap<String, DocumentState>>>,
    uri: &Uri,
) -> Option<DocumentState> {
    let doc_map = document_map.lock().await;
    doc_map.get(&uri.to_string()).cloned()
}

pub(crate) async fn get_config(
    client: &tower_lsp_server::Client,
    workspace_root: &Arc<Mutex<Option<PathBuf>>>,
) -> Config {
    let workspace_root = workspace_root.lock().await.clone();
    load_config(client, &workspace_root).await
}

/// Combined helper: get document and config in one call
pub(crate) async fn get_document_and_config(
    client: &tower_lsp_server::Client,
    document_map: &Arc<Mutex<HashMap<String, DocumentState>>>,
    workspace_root: &Arc<Mutex<Option<PathBuf>>>,
    uri: &Uri,
) -> Option<(DocumentState, Config)> {
    let document = get_document(document_map, uri).await?;
    let config = get_config(client, workspace_root).await;
    Some((document, config))
}
