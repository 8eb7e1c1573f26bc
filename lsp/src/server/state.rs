use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use ropey::Rope;
use tower_lsp::lsp_types::Url;
use tower_lsp::Client;

use super::config::ServerConfig;

/// In-memory representation of an open document. Nothing is cached beyond
/// the text: every query re-parses the current content, so each document's
/// index is rebuilt wholesale and never leaks across URIs.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
}

/// Primary LSP server state shared across handlers.
pub(crate) struct NirLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) config: Mutex<ServerConfig>,
}

impl NirLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            config: Mutex::new(ServerConfig::default()),
        }
    }

    /// Snapshot of a document's current text, when the document is open and
    /// within the configured size limit.
    pub(crate) fn document_text(&self, uri: &Url) -> Option<String> {
        let max_bytes = self.config.lock().unwrap().max_file_bytes;
        let doc = self.documents.get(uri)?;
        if doc.content.len_bytes() > max_bytes {
            return None;
        }
        Some(doc.content.to_string())
    }
}
