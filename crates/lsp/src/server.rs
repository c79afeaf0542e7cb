//! LSP server main loop with request/notification dispatch.
//!
//! Uses `lsp-server` (synchronous, crossbeam-based) for the transport.
//! No async runtime needed -- a single loop owns all document state.
//! The editor's buffer is the source of truth: content arrives through
//! didOpen/didChange (full sync) and is never read from disk.

use lsp_server::{Connection, Message, Notification, Response};
use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, Notification as _,
    PublishDiagnostics,
};
use lsp_types::request::{Completion, GotoDefinition, HoverRequest, ResolveCompletionItem};
use lsp_types::{
    CompletionOptions, CompletionResponse, GotoDefinitionResponse, HoverProviderCapability,
    Location, OneOf, PublishDiagnosticsParams, ServerCapabilities, TextDocumentSyncCapability,
    TextDocumentSyncKind, TextDocumentSyncOptions, Uri,
};

use crate::completion;
use crate::config::ServerConfig;
use crate::definition;
use crate::diagnostics;
use crate::document::DocumentState;
use crate::hover;

/// Run the LSP server over stdio until shutdown.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Set up logging. Stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let (connection, io_threads) = Connection::stdio();

    // ── Initialize handshake ──────────────────────────────────────────
    let server_capabilities = build_capabilities();
    let init_json = serde_json::to_value(&server_capabilities)?;
    let init_params: lsp_types::InitializeParams =
        serde_json::from_value(connection.initialize(init_json)?)?;
    let config =
        ServerConfig::from_initialization_options(init_params.initialization_options.as_ref());
    tracing::info!(max_diagnostics = config.max_diagnostics, "server initialized");

    // ── Main loop ─────────────────────────────────────────────────────
    let mut doc_state = DocumentState::new();

    for msg in &connection.receiver {
        match msg {
            Message::Request(req) => {
                if connection.handle_shutdown(&req)? {
                    break;
                }
                handle_request(&connection, &doc_state, req)?;
            }
            Message::Notification(not) => {
                handle_notification(&connection, &mut doc_state, &config, not)?;
            }
            Message::Response(_) => {
                // Ignore responses (we don't send requests to the client)
            }
        }
    }

    io_threads.join()?;
    Ok(())
}

fn build_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                ..Default::default()
            },
        )),
        definition_provider: Some(OneOf::Left(true)),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec![".".into()]),
            resolve_provider: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn handle_request(
    connection: &Connection,
    doc_state: &DocumentState,
    req: lsp_server::Request,
) -> Result<(), Box<dyn std::error::Error>> {
    use lsp_types::request::Request as _;

    if req.method == Completion::METHOD {
        let params: lsp_types::CompletionParams = serde_json::from_value(req.params.clone())?;
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let items = match doc_state.get(uri.as_str()) {
            Some(doc) => completion::compute_completions(&doc.content, position),
            None => Vec::new(),
        };
        let result = CompletionResponse::Array(items);
        let resp = Response::new_ok(req.id, serde_json::to_value(result)?);
        connection.sender.send(Message::Response(resp))?;
    } else if req.method == ResolveCompletionItem::METHOD {
        let item: lsp_types::CompletionItem = serde_json::from_value(req.params.clone())?;
        let resolved = completion::resolve_completion(item);
        let resp = Response::new_ok(req.id, serde_json::to_value(resolved)?);
        connection.sender.send(Message::Response(resp))?;
    } else if req.method == HoverRequest::METHOD {
        let params: lsp_types::HoverParams = serde_json::from_value(req.params.clone())?;
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let result = doc_state
            .get(uri.as_str())
            .and_then(|doc| hover::compute_hover(&doc.content, position));
        let resp = Response::new_ok(req.id, serde_json::to_value(result)?);
        connection.sender.send(Message::Response(resp))?;
    } else if req.method == GotoDefinition::METHOD {
        let params: lsp_types::GotoDefinitionParams = serde_json::from_value(req.params.clone())?;
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let result = resolve_definition_response(doc_state, uri, position);
        let resp = Response::new_ok(req.id, serde_json::to_value(result)?);
        connection.sender.send(Message::Response(resp))?;
    } else {
        // Unknown request -- method not found
        let resp = Response::new_err(
            req.id,
            lsp_server::ErrorCode::MethodNotFound as i32,
            format!("method not found: {}", req.method),
        );
        connection.sender.send(Message::Response(resp))?;
    }
    Ok(())
}

/// Serve go-to-definition from the last clean parse. After an edit that
/// broke the parse the cached rules are older than the buffer; spans
/// that no longer fit are dropped inside `resolve_definition`.
fn resolve_definition_response(
    doc_state: &DocumentState,
    uri: &Uri,
    position: lsp_types::Position,
) -> Option<GotoDefinitionResponse> {
    let doc = doc_state.get(uri.as_str())?;
    let cache = doc.rules.as_ref()?;
    if cache.version != doc.version {
        tracing::debug!(
            cached = cache.version,
            current = doc.version,
            "serving definition from stale rules"
        );
    }
    definition::resolve_definition(&doc.content, &cache.rules, position)
        .map(|range| GotoDefinitionResponse::Scalar(Location::new(uri.clone(), range)))
}

fn handle_notification(
    connection: &Connection,
    doc_state: &mut DocumentState,
    config: &ServerConfig,
    not: Notification,
) -> Result<(), Box<dyn std::error::Error>> {
    match not.method.as_str() {
        m if m == DidOpenTextDocument::METHOD => {
            let params: lsp_types::DidOpenTextDocumentParams = serde_json::from_value(not.params)?;
            let uri = params.text_document.uri;
            doc_state.open(
                uri.as_str(),
                params.text_document.version,
                params.text_document.text,
            );
            validate_and_publish(connection, doc_state, config, &uri)?;
        }
        m if m == DidChangeTextDocument::METHOD => {
            let params: lsp_types::DidChangeTextDocumentParams =
                serde_json::from_value(not.params)?;
            let uri = params.text_document.uri;
            // FULL sync: last content change has the entire document
            if let Some(change) = params.content_changes.into_iter().last() {
                doc_state.change(uri.as_str(), params.text_document.version, change.text);
            }
            validate_and_publish(connection, doc_state, config, &uri)?;
        }
        m if m == DidCloseTextDocument::METHOD => {
            let params: lsp_types::DidCloseTextDocumentParams = serde_json::from_value(not.params)?;
            let uri = params.text_document.uri;
            doc_state.close(uri.as_str());
            // Clear diagnostics for the closed file
            publish_diagnostics(connection, uri, Vec::new(), None)?;
        }
        _ => {
            // Unknown notification -- ignore
        }
    }
    Ok(())
}

/// Parse the tracked content, cache rules on success, and publish the
/// resulting diagnostics (an empty list clears earlier ones).
fn validate_and_publish(
    connection: &Connection,
    doc_state: &mut DocumentState,
    config: &ServerConfig,
    uri: &Uri,
) -> Result<(), Box<dyn std::error::Error>> {
    let (content, version) = match doc_state.get(uri.as_str()) {
        Some(doc) => (doc.content.clone(), doc.version),
        None => return Ok(()),
    };
    let diags = match diagnostics::check_document(&content, config.max_diagnostics) {
        Ok(rules) => {
            doc_state.cache_rules(uri.as_str(), version, rules);
            Vec::new()
        }
        Err(diags) => diags,
    };
    tracing::debug!(uri = uri.as_str(), version, count = diags.len(), "publishing diagnostics");
    publish_diagnostics(connection, uri.clone(), diags, Some(version))
}

/// Send `textDocument/publishDiagnostics` notification to the client.
fn publish_diagnostics(
    connection: &Connection,
    uri: Uri,
    diagnostics: Vec<lsp_types::Diagnostic>,
    version: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = PublishDiagnosticsParams {
        uri,
        diagnostics,
        version,
    };
    let not = Notification::new(PublishDiagnostics::METHOD.to_string(), params);
    connection.sender.send(Message::Notification(not))?;
    Ok(())
}
