//! Error taxonomy shared by every command.
//!
//! Messages are user-facing: the command layer shows `to_string()` as a
//! notification. A leading `$(icon)  ` marker is rendered by clients that
//! support codicons and stripped otherwise.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// No identifier under the cursor or selection.
    #[error("No class is selected.")]
    NoSelection,

    /// No candidate file or namespace declares the class.
    #[error("$(circle-slash)  The class is not found.")]
    ClassNotFound { class_name: String },

    /// The exact `use` line already exists.
    #[error("The class is already imported.")]
    AlreadyImported { fqcn: String },

    /// Fewer than two `use` statements.
    #[error("Nothing to sort.")]
    NothingToSort,

    /// The chosen alias collides with an existing import.
    #[error("This alias is already in use.")]
    AliasConflict { alias: String },

    #[error("No folder opened in workspace, cannot find composer.json")]
    NoWorkspaceFolder,

    #[error("No composer.json file found, automatic namespace generation failed")]
    ManifestNotFound,

    #[error("No autoload object in composer.json, automatic namespace generation failed")]
    NoAutoloadConfig,

    #[error("No psr-4 key in composer.json autoload object, automatic namespace generation failed")]
    NoPsr4Entry,

    #[error("No psr-4 entry of composer.json matches {path}, automatic namespace generation failed")]
    NoMatchingPsr4Entry { path: String },

    #[error("Invalid composer.json: {0}")]
    InvalidManifest(String),

    /// The editor refused to apply a planned edit.
    #[error("The editor rejected the change.")]
    EditRejected,
}
