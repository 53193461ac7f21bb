use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_lsp_server::Client;
use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::ls_types::*;

use crate::lsp::{APPLY_CUSTOM_FIX_COMMAND, DocumentState};
use crate::{Config, Dialect, Issue, rewriter};

use super::super::conversions::{issue_to_diagnostic, line_range};
use super::super::helpers::get_document_and_config;

/// Edit replacing `line` with its rewritten version, or `None` if the
/// rewriter leaves it unchanged.
pub(crate) fn line_fix_edit(
    text: &str,
    line: usize,
    tag_name: &str,
    alt: &str,
    dialect: Dialect,
) -> Option<TextEdit> {
    let current = rewriter::line_text(text, line)?;
    let new_text = rewriter::rewrite(current, tag_name, alt, dialect.self_closing_syntax());
    (new_text != current).then(|| TextEdit {
        range: line_range(text, line),
        new_text,
    })
}

fn quick_fix(
    title: String,
    uri: &Uri,
    edit: TextEdit,
    diagnostic: &Diagnostic,
) -> CodeActionOrCommand {
    let mut changes = HashMap::new();
    changes.insert(uri.clone(), vec![edit]);

    CodeActionOrCommand::CodeAction(CodeAction {
        title,
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic.clone()]),
        edit: Some(WorkspaceEdit {
            changes: Some(changes),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Actions offered for one issue, in display order.
pub(crate) fn actions_for_issue(
    issue: &Issue,
    text: &str,
    uri: &Uri,
    dialect: Dialect,
    config: &Config,
) -> Vec<CodeActionOrCommand> {
    let diagnostic = issue_to_diagnostic(issue, text);
    let line = rewriter::tag_line(text, issue.offset);
    let mut actions = Vec::new();

    if let Some(suggestion) = issue.suggested_alt()
        && let Some(edit) = line_fix_edit(text, line, &issue.tag_name, &suggestion, dialect)
    {
        actions.push(quick_fix(
            format!("Add alt text \"{}\"", suggestion),
            uri,
            edit,
            &diagnostic,
        ));
    }

    if dialect.supports_translation_placeholder()
        && let Some(edit) = line_fix_edit(
            text,
            line,
            &issue.tag_name,
            &config.translation_placeholder,
            dialect,
        )
    {
        actions.push(quick_fix(
            "Add translation placeholder".to_string(),
            uri,
            edit,
            &diagnostic,
        ));
    }

    let title = "Add descriptive alt text…".to_string();
    actions.push(CodeActionOrCommand::CodeAction(CodeAction {
        title: title.clone(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic]),
        command: Some(Command {
            title,
            command: APPLY_CUSTOM_FIX_COMMAND.to_string(),
            arguments: Some(vec![
                serde_json::Value::from(uri.to_string()),
                serde_json::Value::from(line),
                serde_json::Value::from(issue.tag_name.clone()),
            ]),
        }),
        ..Default::default()
    }));

    actions
}

/// Handle textDocument/codeAction request
pub(crate) async fn code_action(
    client: &Client,
    document_map: Arc<Mutex<HashMap<String, DocumentState>>>,
    workspace_root: Arc<Mutex<Option<PathBuf>>>,
    params: CodeActionParams,
) -> Result<Option<CodeActionResponse>> {
    let uri = params.text_document.uri;

    let (doc_state, config) =
        match get_document_and_config(client, &document_map, &workspace_root, &uri).await {
            Some(result) => result,
            None => return Ok(None),
        };
    let Some(dialect) = doc_state.dialect else {
        return Ok(None);
    };

    let text = doc_state.text;
    let text_clone = text.clone();
    let scan_config = config.clone();
    let issues =
        tokio::task::spawn_blocking(move || crate::check(&text_clone, dialect, &scan_config))
            .await
            .map_err(|_| tower_lsp_server::jsonrpc::Error::internal_error())?;

    let first_line = params.range.start.line as usize;
    let last_line = params.range.end.line as usize;

    let actions: Vec<CodeActionOrCommand> = issues
        .iter()
        .filter(|issue| {
            let lines = first_line..=last_line;
            lines.contains(&issue.line) || lines.contains(&rewriter::tag_line(&text, issue.offset))
        })
        .flat_map(|issue| actions_for_issue(issue, &text, &uri, dialect, &config))
        .collect();

    Ok(Some(actions))
}
