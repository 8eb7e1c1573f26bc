use ropey::Rope;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::info;

use super::analysis;
use super::state::{Document, NirLanguageServer};

#[tower_lsp::async_trait]
impl LanguageServer for NirLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("NIR Language Server initializing with root {:?}", params.root_uri);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Full sync: the core re-parses the whole document anyway
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                references_provider: Some(OneOf::Left(true)),
                definition_provider: Some(OneOf::Left(true)),
                diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                    identifier: Some("nir".to_string()),
                    inter_file_dependencies: false,
                    workspace_diagnostics: false,
                    work_done_progress_options: Default::default(),
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "NIR Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("NIR Language Server initialized");
        let _ = self
            .client
            .log_message(MessageType::INFO, "NIR Language Server started")
            .await;
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("NIR Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, _params: DidChangeConfigurationParams) {
        self.load_config().await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let document = Document {
            content: Rope::from_str(&params.text_document.text),
            version: params.text_document.version,
        };
        self.documents.insert(uri.clone(), document);
        self.publish_diagnostics(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = params.text_document.version;
            // full sync: the last change carries the whole document
            if let Some(change) = params.content_changes.into_iter().next_back() {
                entry.content = Rope::from_str(&change.text);
            }
        }
        self.publish_diagnostics(&uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.publish_diagnostics(&params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        let _ = self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> Result<Option<DocumentSymbolResponse>> {
        let uri = &params.text_document.uri;
        if analysis::is_order_document(uri) {
            return Ok(None);
        }
        let Some(text) = self.document_text(uri) else {
            return Ok(None);
        };
        let symbols = analysis::analyze_document(&text).symbols;
        if symbols.is_empty() {
            return Ok(None);
        }
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(text) = self.document_text(uri) else {
            return Ok(None);
        };

        let location = if analysis::is_order_document(uri) {
            analysis::order_jump_location(&text, position.line, uri)
        } else {
            analysis::definition(&text, position, uri)
        };
        Ok(location.map(GotoDefinitionResponse::Scalar))
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(text) = self.document_text(uri) else {
            return Ok(None);
        };

        let locations = analysis::references(&text, position, uri);
        if locations.is_empty() {
            return Ok(None);
        }
        Ok(Some(locations))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(text) = self.document_text(uri) else {
            return Ok(None);
        };
        Ok(analysis::hover(&text, position))
    }

    async fn diagnostic(&self, params: DocumentDiagnosticParams) -> Result<DocumentDiagnosticReportResult> {
        let uri = &params.text_document.uri;
        let items = self
            .document_text(uri)
            .map(|text| analysis::analyze_document(&text).diagnostics)
            .unwrap_or_default();

        Ok(DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(
            RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport {
                    result_id: None,
                    items,
                },
            },
        )))
    }
}

impl NirLanguageServer {
    async fn publish_diagnostics(&self, uri: &Url) {
        let enabled = self.config.lock().unwrap().publish_diagnostics;
        if !enabled {
            return;
        }
        if analysis::is_order_document(uri) {
            return;
        }
        let Some(text) = self.document_text(uri) else {
            return;
        };
        let version = self.documents.get(uri).map(|d| d.version);
        let diagnostics = analysis::analyze_document(&text).diagnostics;
        let _ = self
            .client
            .publish_diagnostics(uri.clone(), diagnostics, version)
            .await;
    }
}
