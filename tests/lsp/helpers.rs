//! Test helpers for LSP integration testing
//!
//! This module provides utilities to test LSP functionality in-memory
//! without spawning the binary or dealing with stdio protocol.

use std::sync::Arc;
use tower_lsp_server::ls_types::*;
use tower_lsp_server::{LanguageServer, LspService};

use altfix::lsp::AltfixLsp;

/// Test harness for LSP integration tests.
///
/// Wraps an `AltfixLsp` instance created via `LspService::new`, the same
/// way the stdio server builds it.
pub struct TestLspServer {
    lsp: Arc<AltfixLsp>,
}

impl TestLspServer {
    pub fn new() -> Self {
        // Shared slot so the closure can hand the server back to us
        let slot: Arc<std::sync::Mutex<Option<Arc<AltfixLsp>>>> =
            Arc::new(std::sync::Mutex::new(None));
        let slot_clone = Arc::clone(&slot);

        let (_service, _socket) = LspService::new(move |client| {
            let lsp = Arc::new(AltfixLsp::new(client));
            *slot_clone.lock().unwrap() = Some(Arc::clone(&lsp));
            LspWrapper { inner: lsp }
        });

        let lsp = slot
            .lock()
            .unwrap()
            .take()
            .expect("AltfixLsp should have been initialized");

        Self { lsp }
    }

    /// Simulates the `textDocument/didOpen` notification.
    pub async fn open_document(&self, uri: &str, content: &str, language_id: &str) {
        let params = DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.parse().unwrap(),
                language_id: language_id.to_string(),
                version: 0,
                text: content.to_string(),
            },
        };

        self.lsp.did_open(params).await;
    }

    /// Simulates the `textDocument/didClose` notification.
    pub async fn close_document(&self, uri: &str) {
        let params = DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier {
                uri: uri.parse().unwrap(),
            },
        };

        self.lsp.did_close(params).await;
    }

    /// Simulates the `textDocument/didChange` notification with INCREMENTAL sync.
    pub async fn edit_document(&self, uri: &str, changes: Vec<TextDocumentContentChangeEvent>) {
        let params = DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.parse().unwrap(),
                version: 1,
            },
            content_changes: changes,
        };

        self.lsp.did_change(params).await;
    }

    /// Simulates the `textDocument/codeAction` request for whole lines
    /// `start_line..=end_line`.
    pub async fn get_code_actions(
        &self,
        uri: &str,
        start_line: u32,
        end_line: u32,
    ) -> Option<CodeActionResponse> {
        let params = CodeActionParams {
            text_document: TextDocumentIdentifier {
                uri: uri.parse().unwrap(),
            },
            range: Range {
                start: Position {
                    line: start_line,
                    character: 0,
                },
                end: Position {
                    line: end_line,
                    character: 0,
                },
            },
            context: CodeActionContext {
                diagnostics: vec![],
                only: None,
                trigger_kind: None,
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        };

        self.lsp.code_action(params).await.unwrap()
    }

    /// Simulates the `workspace/executeCommand` request.
    pub async fn execute_command(
        &self,
        command: &str,
        arguments: Vec<serde_json::Value>,
    ) -> tower_lsp_server::jsonrpc::Result<Option<LSPAny>> {
        let params = ExecuteCommandParams {
            command: command.to_string(),
            arguments,
            work_done_progress_params: WorkDoneProgressParams::default(),
        };

        self.lsp.execute_command(params).await
    }

    /// Current content of a document from the server's state.
    pub async fn get_document_content(&self, uri: &str) -> Option<String> {
        let doc_map = self.lsp.document_map();
        let docs = doc_map.lock().await;
        docs.get(uri).map(|state| state.text.clone())
    }
}

/// Delegates every LanguageServer method to the inner `Arc<AltfixLsp>`.
///
/// LspService requires ownership of the LanguageServer impl, but the tests
/// also need to keep a reference.
struct LspWrapper {
    inner: Arc<AltfixLsp>,
}

impl LanguageServer for LspWrapper {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> tower_lsp_server::jsonrpc::Result<InitializeResult> {
        self.inner.initialize(params).await
    }

    async fn initialized(&self, params: InitializedParams) {
        self.inner.initialized(params).await
    }

    async fn shutdown(&self) -> tower_lsp_server::jsonrpc::Result<()> {
        self.inner.shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.inner.did_open(params).await
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.inner.did_change(params).await
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.inner.did_close(params).await
    }

    async fn code_action(
        &self,
        params: CodeActionParams,
    ) -> tower_lsp_server::jsonrpc::Result<Option<CodeActionResponse>> {
        self.inner.code_action(params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> tower_lsp_server::jsonrpc::Result<Option<LSPAny>> {
        self.inner.execute_command(params).await
    }
}

/// Full document replacement.
pub fn full_document_change(text: &str) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: None,
        range_length: None,
        text: text.to_string(),
    }
}

/// Incremental change replacing the given range.
pub fn incremental_change(
    start_line: u32,
    start_char: u32,
    end_line: u32,
    end_char: u32,
    text: &str,
) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: Some(Range {
            start: Position {
                line: start_line,
                character: start_char,
            },
            end: Position {
                line: end_line,
                character: end_char,
            },
        }),
        range_length: None,
        text: text.to_string(),
    }
}

/// Titles of the returned actions, in order.
pub fn action_titles(actions: &CodeActionResponse) -> Vec<String> {
    actions
        .iter()
        .map(|action| match action {
            CodeActionOrCommand::CodeAction(a) => a.title.clone(),
            CodeActionOrCommand::Command(c) => c.title.clone(),
        })
        .collect()
}

/// The single text edit carried by a quick fix.
pub fn quick_fix_edit(action: &CodeActionOrCommand) -> TextEdit {
    let CodeActionOrCommand::CodeAction(action) = action else {
        panic!("expected a code action");
    };
    let changes = action
        .edit
        .as_ref()
        .and_then(|edit| edit.changes.as_ref())
        .expect("quick fix carries changes");
    let edits: Vec<&TextEdit> = changes.values().flatten().collect();
    assert_eq!(edits.len(), 1);
    edits[0].clone()
}
