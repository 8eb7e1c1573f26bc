use serde::Deserialize;
use tower_lsp::lsp_types::ConfigurationItem;

use super::state::NirLanguageServer;

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) publish_diagnostics: bool,
    pub(crate) max_file_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            publish_diagnostics: true,
            max_file_bytes: 4 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct NirLspConfigSection {
    #[serde(default)]
    publish_diagnostics: Option<bool>,
    #[serde(default)]
    max_file_bytes: Option<usize>,
}

impl NirLanguageServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some("nir.lsp".to_string()),
        }];

        if let Ok(values) = self.client.configuration(items).await {
            if let Some(val) = values.into_iter().next() {
                if let Ok(cfg) = serde_json::from_value::<NirLspConfigSection>(val) {
                    let mut guard = self.config.lock().unwrap();
                    guard.publish_diagnostics = cfg.publish_diagnostics.unwrap_or(true);
                    if let Some(v) = cfg.max_file_bytes.filter(|v| *v > 0) {
                        guard.max_file_bytes = v;
                    }
                }
            }
        }
    }
}
