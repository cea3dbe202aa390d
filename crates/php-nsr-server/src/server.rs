//! LSP server implementation: the LanguageServer trait.
//!
//! The server keeps a copy of every open document (full sync) and exposes the
//! resolver commands through `workspace/executeCommand` and code actions.

use crate::commands;
use crate::editor::uri_to_path;
use crate::host::{LspEditor, OpenDocument};
use dashmap::DashMap;
use php_nsr_types::Settings;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::ls_types::*;
use tower_lsp::{Client, LanguageServer};

pub const IMPORT_COMMAND: &str = "namespaceResolver.import";
pub const IMPORT_ALL_COMMAND: &str = "namespaceResolver.importAll";
pub const EXPAND_COMMAND: &str = "namespaceResolver.expand";
pub const SORT_COMMAND: &str = "namespaceResolver.sort";
pub const GENERATE_NAMESPACE_COMMAND: &str = "namespaceResolver.generateNamespace";

pub const COMMANDS: [&str; 5] = [
    IMPORT_COMMAND,
    IMPORT_ALL_COMMAND,
    EXPAND_COMMAND,
    SORT_COMMAND,
    GENERATE_NAMESPACE_COMMAND,
];

/// Settings section name, used when the client sends the whole
/// configuration object.
const SETTINGS_SECTION: &str = "namespaceResolver";

/// First argument of every command: the document and the cursor positions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandArguments {
    uri: String,
    #[serde(default)]
    positions: Vec<Position>,
}

/// Main LSP backend holding all state.
pub struct NamespaceResolverBackend {
    client: Client,
    /// Open documents (URI string → text and version).
    documents: DashMap<String, OpenDocument>,
    /// Workspace root path (set during initialize).
    workspace_root: Mutex<Option<PathBuf>>,
    settings: Mutex<Settings>,
    /// Held for the whole of a command so commands never interleave.
    command_lock: Mutex<()>,
}

impl NamespaceResolverBackend {
    pub fn new(client: Client) -> Self {
        NamespaceResolverBackend {
            client,
            documents: DashMap::new(),
            workspace_root: Mutex::new(None),
            settings: Mutex::new(Settings::default()),
            command_lock: Mutex::new(()),
        }
    }

    async fn update_settings(&self, value: &serde_json::Value) {
        if let Some(settings) = settings_from_value(value) {
            tracing::info!("Settings updated: {:?}", settings);
            *self.settings.lock().await = settings;
        }
    }
}

/// Read [`Settings`] from a configuration object, either the section itself
/// or an object holding it under `namespaceResolver`.
pub fn settings_from_value(value: &serde_json::Value) -> Option<Settings> {
    let section = value.get(SETTINGS_SECTION).unwrap_or(value);
    if !section.is_object() {
        return None;
    }
    match serde_json::from_value(section.clone()) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!("Ignoring invalid settings: {}", e);
            None
        }
    }
}

fn command_action(
    title: &str,
    kind: CodeActionKind,
    command: &str,
    arguments: &serde_json::Value,
) -> CodeActionOrCommand {
    CodeActionOrCommand::CodeAction(CodeAction {
        title: title.to_string(),
        kind: Some(kind),
        command: Some(Command {
            title: title.to_string(),
            command: command.to_string(),
            arguments: Some(vec![arguments.clone()]),
        }),
        ..Default::default()
    })
}

impl LanguageServer for NamespaceResolverBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("php-nsr: initialize");

        #[allow(deprecated)]
        let root_path = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|folder| uri_to_path(folder.uri.as_str()))
            .or_else(|| {
                params
                    .root_uri
                    .as_ref()
                    .and_then(|uri| uri_to_path(uri.as_str()))
            })
            .or_else(|| params.root_path.as_ref().map(PathBuf::from));

        if let Some(ref root) = root_path {
            tracing::info!("Workspace root: {}", root.display());
            *self.workspace_root.lock().await = Some(root.clone());
        }

        if let Some(ref opts) = params.initialization_options {
            self.update_settings(opts).await;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        ..Default::default()
                    },
                )),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "php-nsr".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        tracing::info!("php-nsr: initialized");
        self.client
            .log_message(MessageType::INFO, "php-nsr server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("php-nsr: shutdown");
        Ok(())
    }

    // --- Document Synchronization ---

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        tracing::debug!("didOpen: {}", doc.uri.as_str());
        self.documents.insert(
            doc.uri.as_str().to_string(),
            OpenDocument::new(&doc.text, doc.version),
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri_str = params.text_document.uri.as_str().to_string();
        tracing::debug!("didChange: {}", uri_str);

        if let Some(mut doc) = self.documents.get_mut(&uri_str) {
            for change in &params.content_changes {
                if let Some(range) = change.range {
                    doc.text.apply_edit(
                        range.start.line,
                        range.start.character,
                        range.end.line,
                        range.end.character,
                        &change.text,
                    );
                } else {
                    // Full content replacement
                    doc.text.set_text(&change.text);
                }
            }
            doc.version = params.text_document.version;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri_str = params.text_document.uri.as_str().to_string();
        tracing::debug!("didClose: {}", uri_str);
        self.documents.remove(&uri_str);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.update_settings(&params.settings).await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = params.text_document.uri.as_str();
        let position = params.range.start;

        let has_word = match self.documents.get(uri) {
            Some(doc) => doc.text.word_at(position.line, position.character).is_some(),
            None => return Ok(None),
        };

        let arguments = json!({ "uri": uri, "positions": [position] });
        let mut actions = Vec::new();
        if has_word {
            for (title, command) in [
                ("Import class", IMPORT_COMMAND),
                ("Expand class", EXPAND_COMMAND),
            ] {
                let kind = CodeActionKind::REFACTOR;
                actions.push(command_action(title, kind, command, &arguments));
            }
        }
        for (title, command) in [
            ("Import all classes", IMPORT_ALL_COMMAND),
            ("Sort imports", SORT_COMMAND),
            ("Generate namespace for this file", GENERATE_NAMESPACE_COMMAND),
        ] {
            let kind = CodeActionKind::SOURCE;
            actions.push(command_action(title, kind, command, &arguments));
        }
        Ok(Some(actions))
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        let command = params.command.as_str();
        if !COMMANDS.contains(&command) {
            return Err(Error::invalid_params(format!("Unknown command: {}", command)));
        }
        let arguments = params
            .arguments
            .first()
            .cloned()
            .ok_or_else(|| Error::invalid_params("Missing command arguments"))?;
        let arguments: CommandArguments = serde_json::from_value(arguments)
            .map_err(|e| Error::invalid_params(format!("Invalid command arguments: {}", e)))?;

        let _guard = self.command_lock.lock().await;
        tracing::info!("executeCommand: {} {}", command, arguments.uri);

        let settings = self.settings.lock().await.clone();
        let workspace_root = self.workspace_root.lock().await.clone();
        let editor = LspEditor::new(&self.client, &self.documents, settings, workspace_root);

        let uri = arguments.uri.as_str();
        let positions: Vec<(u32, u32)> = arguments
            .positions
            .iter()
            .map(|p| (p.line, p.character))
            .collect();

        match command {
            IMPORT_COMMAND => commands::import_selections(&editor, uri, &positions).await,
            IMPORT_ALL_COMMAND => commands::import_all(&editor, uri).await,
            EXPAND_COMMAND => commands::expand_selections(&editor, uri, &positions).await,
            SORT_COMMAND => commands::sort_command(&editor, uri).await,
            _ => commands::generate_namespace_command(&editor, uri).await,
        }
        Ok(None)
    }
}
