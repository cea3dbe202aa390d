//! The editor as seen by commands.
//!
//! Commands never talk to the LSP client directly; everything they need from
//! the editor goes through [`Editor`], implemented over the LSP connection by
//! [`crate::host::LspEditor`] and by an in-memory fake in tests.

use php_nsr_types::{Settings, TextEdit};
use std::path::{Path, PathBuf};
use url::Url;

#[allow(async_fn_in_trait)]
pub trait Editor {
    fn settings(&self) -> Settings;

    fn workspace_root(&self) -> Option<PathBuf>;

    /// Current lines of the document under edit.
    fn document_lines(&self, uri: &str) -> Option<Vec<String>>;

    /// Files named `<short_name>.php` in the workspace, minus excluded ones.
    async fn find_candidate_files(&self, short_name: &str) -> Vec<PathBuf>;

    /// Lines of any file, open or not.
    async fn open_document(&self, path: &Path) -> Option<Vec<String>>;

    /// Let the user pick one of `options`. `None` when dismissed.
    async fn prompt_choice(&self, options: &[String]) -> Option<String>;

    /// Ask for free text. `None` when dismissed; an empty answer is
    /// `Some("")`.
    async fn prompt_text(&self, placeholder: &str) -> Option<String>;

    /// Apply `edits` to `uri` as one batch. Returns whether they were applied.
    async fn apply_edits(&self, uri: &str, edits: Vec<TextEdit>) -> bool;

    /// Show a message to the user.
    async fn notify(&self, message: &str, is_error: bool);

    /// Show a short-lived status bar message.
    async fn status_message(&self, message: &str);
}

/// Convert a file:// URI to a filesystem path, decoding percent escapes.
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    Url::parse(uri).ok()?.to_file_path().ok()
}

/// Convert an absolute file path to a file:// URI.
pub fn path_to_uri(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(|url| url.to_string())
}
