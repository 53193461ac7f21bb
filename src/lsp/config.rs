use std::path::PathBuf;
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::MessageType;

/// Load config from the workspace root, falling back to the default.
pub(crate) async fn load_config(client: &Client, workspace_root: &Option<PathBuf>) -> crate::Config {
    let Some(root) = workspace_root.as_ref() else {
        return crate::Config::default();
    };

    match crate::config::load(None, root) {
        Ok((config, path)) => {
            if let Some(p) = path {
                log::debug!("Loaded config from {}", p.display());
            }
            config
        }
        Err(e) => {
            client
                .log_message(
                    MessageType::WARNING,
                    format!("Failed to load config: {}", e),
                )
                .await;
            crate::Config::default()
        }
    }
}
