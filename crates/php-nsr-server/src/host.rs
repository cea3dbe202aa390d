//! [`Editor`] over an LSP connection.
//!
//! Pickers use `window/showMessageRequest`. LSP has no input box, so text
//! prompts and status bar messages go through the custom
//! `phpNamespaceResolver/inputBox` request and
//! `phpNamespaceResolver/statusMessage` notification.

use crate::editor::{path_to_uri, Editor};
use dashmap::DashMap;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use php_nsr_scanner::document::SourceText;
use php_nsr_types::{Settings, TextEdit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tower_lsp::ls_types::notification::Notification;
use tower_lsp::ls_types::request::Request;
use tower_lsp::ls_types::{self, MessageActionItem, MessageType, Position, Range, Uri, WorkspaceEdit};
use tower_lsp::Client;

/// How long a status bar message stays visible.
const STATUS_TIMEOUT_MS: u32 = 3000;

/// An open document and the version the client last sent for it.
#[derive(Debug, Clone)]
pub struct OpenDocument {
    pub text: SourceText,
    pub version: i32,
}

impl OpenDocument {
    pub fn new(text: &str, version: i32) -> Self {
        OpenDocument {
            text: SourceText::new(text),
            version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBoxParams {
    pub placeholder: String,
}

/// Ask the client for a line of text. `null` means dismissed.
pub enum InputBox {}

impl Request for InputBox {
    type Params = InputBoxParams;
    type Result = Option<String>;
    const METHOD: &'static str = "phpNamespaceResolver/inputBox";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessageParams {
    pub message: String,
    pub timeout: u32,
}

pub enum StatusMessage {}

impl Notification for StatusMessage {
    type Params = StatusMessageParams;
    const METHOD: &'static str = "phpNamespaceResolver/statusMessage";
}

/// The editor behind one command invocation.
///
/// Settings and the workspace root are captured when the command starts.
pub struct LspEditor<'a> {
    client: &'a Client,
    documents: &'a DashMap<String, OpenDocument>,
    settings: Settings,
    workspace_root: Option<PathBuf>,
}

impl<'a> LspEditor<'a> {
    pub fn new(
        client: &'a Client,
        documents: &'a DashMap<String, OpenDocument>,
        settings: Settings,
        workspace_root: Option<PathBuf>,
    ) -> Self {
        LspEditor {
            client,
            documents,
            settings,
            workspace_root,
        }
    }
}

impl Editor for LspEditor<'_> {
    fn settings(&self) -> Settings {
        self.settings.clone()
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.clone()
    }

    fn document_lines(&self, uri: &str) -> Option<Vec<String>> {
        self.documents.get(uri).map(|doc| doc.text.lines())
    }

    async fn find_candidate_files(&self, short_name: &str) -> Vec<PathBuf> {
        let Some(root) = self.workspace_root.clone() else {
            tracing::warn!("No workspace root, cannot search for {}", short_name);
            return Vec::new();
        };
        let exclude = exclude_set(&self.settings.exclude);
        let file_name = format!("{}.php", short_name);

        tokio::task::spawn_blocking(move || find_files_named(&root, &file_name, exclude.as_ref()))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("File search failed: {}", e);
                Vec::new()
            })
    }

    async fn open_document(&self, path: &Path) -> Option<Vec<String>> {
        let open = path_to_uri(path)
            .and_then(|uri| self.documents.get(&uri).map(|doc| doc.text.lines()));
        if open.is_some() {
            return open;
        }

        match tokio::fs::read_to_string(path).await {
            Ok(source) => Some(SourceText::new(&source).lines()),
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn prompt_choice(&self, options: &[String]) -> Option<String> {
        let actions = options
            .iter()
            .map(|option| MessageActionItem {
                title: option.clone(),
                properties: HashMap::new(),
            })
            .collect();
        match self
            .client
            .show_message_request(MessageType::INFO, "Select a class to use", Some(actions))
            .await
        {
            Ok(picked) => picked.map(|item| item.title),
            Err(e) => {
                tracing::warn!("showMessageRequest failed: {}", e);
                None
            }
        }
    }

    async fn prompt_text(&self, placeholder: &str) -> Option<String> {
        let params = InputBoxParams {
            placeholder: placeholder.to_string(),
        };
        match self.client.send_request::<InputBox>(params).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("{} failed: {}", InputBox::METHOD, e);
                None
            }
        }
    }

    async fn apply_edits(&self, uri: &str, edits: Vec<TextEdit>) -> bool {
        let Ok(lsp_uri) = uri.parse::<Uri>() else {
            tracing::warn!("Invalid document URI: {}", uri);
            return false;
        };
        let version_before = self.documents.get(uri).map(|doc| doc.version);

        let lsp_edits: Vec<ls_types::TextEdit> = edits.iter().map(to_lsp_edit).collect();
        let edit = WorkspaceEdit {
            changes: Some(HashMap::from([(lsp_uri, lsp_edits)])),
            ..Default::default()
        };

        let applied = match self.client.apply_edit(edit).await {
            Ok(response) => response.applied,
            Err(e) => {
                tracing::warn!("workspace/applyEdit failed: {}", e);
                false
            }
        };
        if !applied {
            return false;
        }

        // Mirror the edit unless the client already sent the new content.
        if let Some(mut doc) = self.documents.get_mut(uri) {
            if Some(doc.version) == version_before {
                doc.text.apply_edits(&edits);
            }
        }
        true
    }

    async fn notify(&self, message: &str, is_error: bool) {
        let kind = if is_error {
            MessageType::ERROR
        } else {
            MessageType::INFO
        };
        self.client.show_message(kind, message).await;
    }

    async fn status_message(&self, message: &str) {
        self.client
            .send_notification::<StatusMessage>(StatusMessageParams {
                message: message.to_string(),
                timeout: STATUS_TIMEOUT_MS,
            })
            .await;
    }
}

fn to_lsp_edit(edit: &TextEdit) -> ls_types::TextEdit {
    let (start_line, start_char, end_line, end_char) = edit.range;
    ls_types::TextEdit {
        range: Range::new(
            Position::new(start_line, start_char),
            Position::new(end_line, end_char),
        ),
        new_text: edit.new_text.clone(),
    }
}

/// Build the exclude matcher. An empty or invalid pattern excludes nothing.
pub fn exclude_set(pattern: &str) -> Option<GlobSet> {
    if pattern.trim().is_empty() {
        return None;
    }
    let glob = match Glob::new(pattern) {
        Ok(glob) => glob,
        Err(e) => {
            tracing::warn!("Ignoring invalid exclude pattern {:?}: {}", pattern, e);
            return None;
        }
    };
    let mut builder = GlobSetBuilder::new();
    builder.add(glob);
    builder.build().ok()
}

/// Every file under `root` called `file_name` that `exclude` does not match.
///
/// Hidden and git-ignored files are searched too.
pub fn find_files_named(root: &Path, file_name: &str, exclude: Option<&GlobSet>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkBuilder::new(root).standard_filters(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if path.file_name().and_then(|n| n.to_str()) != Some(file_name) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclude.is_some_and(|set| set.is_match(relative) || set.is_match(path)) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    tracing::debug!("Found {} files named {}", files.len(), file_name);
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<?php\n").unwrap();
    }

    #[test]
    fn test_find_files_named_honors_exclude() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "app/Models/User.php");
        touch(root, "legacy/User.php");
        touch(root, "node_modules/pkg/User.php");
        touch(root, "app/Models/UserPolicy.php");

        let exclude = exclude_set("**/node_modules/**");
        let files = find_files_named(root, "User.php", exclude.as_ref());
        assert_eq!(
            files,
            vec![root.join("app/Models/User.php"), root.join("legacy/User.php")]
        );

        let all = find_files_named(root, "User.php", None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_hidden_directories_are_searched() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".hidden/Thing.php");
        let files = find_files_named(dir.path(), "Thing.php", None);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_workspace_root_with_space() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("my project");
        touch(&project, "app/User.php");

        let root_uri = path_to_uri(&project).unwrap();
        assert!(root_uri.ends_with("/my%20project"));
        let root = crate::editor::uri_to_path(&root_uri).unwrap();
        assert_eq!(root, project);

        let files = find_files_named(&root, "User.php", None);
        assert_eq!(files, vec![project.join("app/User.php")]);
    }

    #[test]
    fn test_exclude_set() {
        assert!(exclude_set("").is_none());
        assert!(exclude_set("[").is_none());
        let set = exclude_set("{**/node_modules/**,**/vendor/**}").unwrap();
        assert!(set.is_match("vendor/acme/Foo.php"));
        assert!(set.is_match("node_modules/x/Foo.php"));
        assert!(!set.is_match("app/Foo.php"));
    }

    #[test]
    fn test_to_lsp_edit() {
        let edit = to_lsp_edit(&TextEdit::insert(3, 0, "use Foo;\n"));
        assert_eq!(edit.range.start, Position::new(3, 0));
        assert_eq!(edit.range.end, Position::new(3, 0));
        assert_eq!(edit.new_text, "use Foo;\n");
    }
}
