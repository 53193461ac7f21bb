use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_lsp_server::Client;
use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::ls_types::*;

use crate::lsp::{APPLY_CUSTOM_FIX_COMMAND, DocumentState};

use super::code_actions::line_fix_edit;
use super::super::helpers::get_document;

/// Arguments of `altfix.applyCustomFix`: `[uri, line, tagName, altText]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CustomFixArgs {
    pub uri: Uri,
    pub line: usize,
    pub tag_name: String,
    pub alt: String,
}

impl CustomFixArgs {
    /// `None` when an argument is missing or has the wrong type; the alt
    /// text is missing until the client has prompted for it.
    pub(crate) fn parse(arguments: &[serde_json::Value]) -> Option<Self> {
        let [uri, line, tag_name, alt, ..] = arguments else {
            return None;
        };
        Some(Self {
            uri: uri.as_str()?.parse().ok()?,
            line: usize::try_from(line.as_u64()?).ok()?,
            tag_name: tag_name.as_str()?.to_string(),
            alt: alt.as_str()?.to_string(),
        })
    }
}

/// Edit applying user-supplied alt text to the document line.
pub(crate) async fn custom_fix_edit(
    document_map: &Arc<Mutex<HashMap<String, DocumentState>>>,
    args: &CustomFixArgs,
) -> Option<WorkspaceEdit> {
    let doc_state = get_document(document_map, &args.uri).await?;
    let dialect = doc_state.dialect?;
    let edit = line_fix_edit(
        &doc_state.text,
        args.line,
        &args.tag_name,
        &args.alt,
        dialect,
    )?;

    let mut changes = HashMap::new();
    changes.insert(args.uri.clone(), vec![edit]);
    Some(WorkspaceEdit {
        changes: Some(changes),
        ..Default::default()
    })
}

/// Handle workspace/executeCommand request
pub(crate) async fn execute_command(
    client: &Client,
    document_map: Arc<Mutex<HashMap<String, DocumentState>>>,
    params: ExecuteCommandParams,
) -> Result<Option<LSPAny>> {
    if params.command != APPLY_CUSTOM_FIX_COMMAND {
        return Err(tower_lsp_server::jsonrpc::Error::method_not_found());
    }

    let Some(args) = CustomFixArgs::parse(&params.arguments) else {
        log::debug!("{} called without alt text", APPLY_CUSTOM_FIX_COMMAND);
        return Ok(None);
    };

    let Some(edit) = custom_fix_edit(&document_map, &args).await else {
        client
            .log_message(
                MessageType::WARNING,
                format!("No <{}> tag to fix on line {}", args.tag_name, args.line + 1),
            )
            .await;
        return Ok(None);
    };

    if let Err(e) = client.apply_edit(edit).await {
        client
            .log_message(MessageType::ERROR, format!("Failed to apply edit: {}", e))
            .await;
    }

    Ok(None)
}
