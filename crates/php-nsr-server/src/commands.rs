//! The five user commands: import, import all, expand, sort and generate
//! namespace.
//!
//! Each command re-reads the document, plans its edits with the core crates
//! and applies them through [`Editor`]. Errors never escape a command: they
//! are reported to the user at the command's entry point.

use crate::editor::{uri_to_path, Editor};
use php_nsr_import::namespace_stmt::namespace_edit;
use php_nsr_import::planner::{
    insert_use_edit, plan_import, replace_use_edit, resolve_alias, AliasDecision, ImportPlan,
};
use php_nsr_import::sorter::{sort_edits, sort_use_statements};
use php_nsr_index::composer::{manifest_search_dirs, Psr4Map, MANIFEST_FILE};
use php_nsr_index::derive::derive_namespace;
use php_nsr_index::resolver::{is_candidate_file, resolve_namespaces, CandidateDocument};
use php_nsr_scanner::declarations::scan_declarations;
use php_nsr_scanner::document::word_at;
use php_nsr_scanner::references::{extract_references, imported_class_names};
use php_nsr_types::{
    shift_position, CandidateNamespaces, DeclarationLines, ResolverError, Settings, TextEdit,
    UseStatement,
};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};

/// Prefix of every notification.
pub const MESSAGE_PREFIX: &str = "PHP Namespace Resolver: ";

const ALIAS_PLACEHOLDER: &str = "Enter an alias or leave it empty to replace";
const IMPORTED: &str = "$(check)  The class is imported.";
const SORTED: &str = "$(check)  Imports are sorted.";

/// `$(icon)  ` markers only status bars can render.
static ICON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\(.+?\)\s\s").unwrap());

type Range = (u32, u32, u32, u32);

/// Whether a step ran to completion or the user dismissed a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Done,
    Cancelled,
}

/// What to import: the word at a cursor position, or a known class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    Selection { line: u32, character: u32 },
    Class(String),
}

/// Import the class under each cursor, one after the other.
///
/// Cursors still waiting are moved through every edit an earlier cursor
/// made, so they keep pointing at the same word.
pub async fn import_selections<E: Editor>(editor: &E, uri: &str, positions: &[(u32, u32)]) {
    if positions.is_empty() {
        report_error(editor, &ResolverError::NoSelection).await;
        return;
    }
    let log = EditLog::new(editor);
    let mut pending = positions.to_vec();
    for idx in 0..pending.len() {
        let (line, character) = pending[idx];
        let target = ImportTarget::Selection { line, character };
        let outcome = import_command(&log, uri, target).await;
        log.shift(&mut pending[idx + 1..]);
        match outcome {
            Ok(Flow::Done) => {}
            Ok(Flow::Cancelled) => break,
            Err(err) => report_error(editor, &err).await,
        }
    }
}

/// Import every class the document references but does not import yet.
pub async fn import_all<E: Editor>(editor: &E, uri: &str) {
    let Some(lines) = editor.document_lines(uri) else {
        report_error(editor, &ResolverError::NoSelection).await;
        return;
    };
    let imported = imported_class_names(&lines);
    let references = extract_references(&lines.join("\n"));
    tracing::debug!("Import all: {} referenced classes", references.len());

    for class_name in references {
        if imported.contains(&class_name) {
            continue;
        }
        match import_command(editor, uri, ImportTarget::Class(class_name)).await {
            Ok(Flow::Done) => {}
            Ok(Flow::Cancelled) => break,
            Err(err) => report_error(editor, &err).await,
        }
    }
}

pub async fn import_command<E: Editor>(
    editor: &E,
    uri: &str,
    target: ImportTarget,
) -> Result<Flow, ResolverError> {
    let (selection, resolving) = match target {
        ImportTarget::Selection { line, character } => {
            let lines = document(editor, uri)?;
            let (range, word) =
                word_at(&lines, line, character).ok_or(ResolverError::NoSelection)?;
            (Some(range), word)
        }
        ImportTarget::Class(name) => (None, name),
    };

    // a qualified name needs no lookup
    if resolving.contains('\\') {
        let fqcn = resolving.strip_prefix('\\').unwrap_or(&resolving);
        return import_class(editor, uri, selection, fqcn, true).await;
    }

    let candidates = find_candidates(editor, &resolving).await?;
    let Some(fqcn) = pick_class(editor, candidates).await else {
        return Ok(Flow::Cancelled);
    };
    import_class(editor, uri, selection, &fqcn, false).await
}

/// Add `use <fqcn>;`, shortening the selection when `replace_selection` is
/// set and asking for an alias when the short name is taken.
pub async fn import_class<E: Editor>(
    editor: &E,
    uri: &str,
    selection: Option<Range>,
    fqcn: &str,
    replace_selection: bool,
) -> Result<Flow, ResolverError> {
    let lines = document(editor, uri)?;
    let (use_statements, declarations) = scan_declarations(&lines, Some(fqcn))?;

    match plan_import(fqcn, replace_selection, &use_statements) {
        ImportPlan::Insert => {
            apply(editor, uri, vec![insert_use_edit(fqcn, None, &declarations)]).await?;
        }
        ImportPlan::ReplaceSelectionThenInsert { base_name } => {
            let mut edits = Vec::new();
            if let Some(range) = selection {
                edits.push(TextEdit::replace(range, base_name));
            }
            edits.push(insert_use_edit(fqcn, None, &declarations));
            apply(editor, uri, edits).await?;
        }
        ImportPlan::AliasOrReplace => {
            return import_with_alias(
                editor,
                uri,
                selection,
                fqcn,
                &use_statements,
                &declarations,
            )
            .await;
        }
    }

    finish_import(editor, uri).await?;
    Ok(Flow::Done)
}

async fn import_with_alias<E: Editor>(
    editor: &E,
    uri: &str,
    selection: Option<Range>,
    fqcn: &str,
    use_statements: &[UseStatement],
    declarations: &DeclarationLines,
) -> Result<Flow, ResolverError> {
    loop {
        let answer = editor.prompt_text(ALIAS_PLACEHOLDER).await;
        match resolve_alias(answer, use_statements) {
            AliasDecision::Cancel => return Ok(Flow::Cancelled),
            AliasDecision::Conflict(alias) => {
                report_error(editor, &ResolverError::AliasConflict { alias }).await;
            }
            AliasDecision::ReplaceExisting => {
                if let Some(edit) = replace_use_edit(fqcn, use_statements) {
                    apply(editor, uri, vec![edit]).await?;
                }
                auto_sort(editor, uri).await?;
                return Ok(Flow::Done);
            }
            AliasDecision::UseAlias(alias) => {
                let mut edits = Vec::new();
                if let Some(range) = selection {
                    edits.push(TextEdit::replace(range, alias.as_str()));
                }
                edits.push(insert_use_edit(fqcn, Some(&alias), declarations));
                apply(editor, uri, edits).await?;
                finish_import(editor, uri).await?;
                return Ok(Flow::Done);
            }
        }
    }
}

async fn finish_import<E: Editor>(editor: &E, uri: &str) -> Result<(), ResolverError> {
    auto_sort(editor, uri).await?;
    show_message(editor, IMPORTED, false).await;
    Ok(())
}

async fn auto_sort<E: Editor>(editor: &E, uri: &str) -> Result<(), ResolverError> {
    if !editor.settings().auto_sort {
        return Ok(());
    }
    match sort_imports(editor, uri).await {
        Err(ResolverError::NothingToSort) => Ok(()),
        other => other,
    }
}

/// Replace the class under each cursor by its fully qualified name.
pub async fn expand_selections<E: Editor>(editor: &E, uri: &str, positions: &[(u32, u32)]) {
    if positions.is_empty() {
        report_error(editor, &ResolverError::NoSelection).await;
        return;
    }
    let log = EditLog::new(editor);
    let mut pending = positions.to_vec();
    for idx in 0..pending.len() {
        let (line, character) = pending[idx];
        let outcome = expand_command(&log, uri, line, character).await;
        log.shift(&mut pending[idx + 1..]);
        match outcome {
            Ok(Flow::Done) => {}
            Ok(Flow::Cancelled) => break,
            Err(err) => report_error(editor, &err).await,
        }
    }
}

pub async fn expand_command<E: Editor>(
    editor: &E,
    uri: &str,
    line: u32,
    character: u32,
) -> Result<Flow, ResolverError> {
    let lines = document(editor, uri)?;
    let (range, resolving) = word_at(&lines, line, character).ok_or(ResolverError::NoSelection)?;

    let candidates = find_candidates(editor, &resolving).await?;
    let Some(fqcn) = pick_class(editor, candidates).await else {
        return Ok(Flow::Cancelled);
    };

    let separator = if editor.settings().leading_separator {
        "\\"
    } else {
        ""
    };
    apply(
        editor,
        uri,
        vec![TextEdit::replace(range, format!("{}{}", separator, fqcn))],
    )
    .await?;
    Ok(Flow::Done)
}

/// Sort the `use` block and tell the user.
pub async fn sort_command<E: Editor>(editor: &E, uri: &str) {
    match sort_imports(editor, uri).await {
        Ok(()) => show_message(editor, SORTED, false).await,
        Err(err) => report_error(editor, &err).await,
    }
}

pub async fn sort_imports<E: Editor>(editor: &E, uri: &str) -> Result<(), ResolverError> {
    let lines = document(editor, uri)?;
    let (use_statements, _) = scan_declarations(&lines, None)?;
    let sorted = sort_use_statements(&use_statements, editor.settings().sort_policy())?;
    if sorted == use_statements {
        return Ok(());
    }
    apply(editor, uri, sort_edits(&use_statements, &sorted)).await
}

/// Insert or rewrite the namespace statement from composer.json PSR-4 config.
pub async fn generate_namespace_command<E: Editor>(editor: &E, uri: &str) {
    if let Err(err) = generate_namespace(editor, uri).await {
        report_error(editor, &err).await;
    }
}

pub async fn generate_namespace<E: Editor>(editor: &E, uri: &str) -> Result<(), ResolverError> {
    let root = editor
        .workspace_root()
        .ok_or(ResolverError::NoWorkspaceFolder)?;
    let file_path = uri_to_path(uri).ok_or(ResolverError::ManifestNotFound)?;

    let mut manifest = None;
    for dir in manifest_search_dirs(&file_path, &root)? {
        if let Some(lines) = editor.open_document(&dir.join(MANIFEST_FILE)).await {
            manifest = Some((dir, lines.join("\n")));
            break;
        }
    }
    let (project_root, content) = manifest.ok_or(ResolverError::ManifestNotFound)?;
    tracing::debug!("Using {} in {}", MANIFEST_FILE, project_root.display());

    let psr4 = Psr4Map::from_manifest(&content)?;
    let namespace = derive_namespace(&file_path, &project_root, &psr4)?;

    let lines = document(editor, uri)?;
    let (_, declarations) = scan_declarations(&lines, None)?;
    apply(
        editor,
        uri,
        vec![namespace_edit(&namespace, &lines, &declarations)],
    )
    .await
}

async fn find_candidates<E: Editor>(
    editor: &E,
    short_name: &str,
) -> Result<CandidateNamespaces, ResolverError> {
    let mut documents = Vec::new();
    for path in editor.find_candidate_files(short_name).await {
        if !is_candidate_file(&path, short_name) {
            continue;
        }
        if let Some(lines) = editor.open_document(&path).await {
            documents.push(CandidateDocument::new(path, lines));
        }
    }
    resolve_namespaces(short_name, &documents)
}

async fn pick_class<E: Editor>(editor: &E, candidates: CandidateNamespaces) -> Option<String> {
    if let Some(only) = candidates.single() {
        return Some(only.to_string());
    }
    editor.prompt_choice(candidates.as_slice()).await
}

fn document<E: Editor>(editor: &E, uri: &str) -> Result<Vec<String>, ResolverError> {
    editor.document_lines(uri).ok_or_else(|| {
        tracing::warn!("Document not open: {}", uri);
        ResolverError::NoSelection
    })
}

async fn apply<E: Editor>(
    editor: &E,
    uri: &str,
    edits: Vec<TextEdit>,
) -> Result<(), ResolverError> {
    if editor.apply_edits(uri, edits).await {
        Ok(())
    } else {
        Err(ResolverError::EditRejected)
    }
}

/// An [`Editor`] that remembers the edit batches it applied.
struct EditLog<'e, E> {
    editor: &'e E,
    applied: Mutex<Vec<Vec<TextEdit>>>,
}

impl<'e, E: Editor> EditLog<'e, E> {
    fn new(editor: &'e E) -> Self {
        EditLog {
            editor,
            applied: Mutex::new(Vec::new()),
        }
    }

    /// Move `positions` through every batch applied since the last call.
    fn shift(&self, positions: &mut [(u32, u32)]) {
        let batches = std::mem::take(
            &mut *self
                .applied
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for batch in &batches {
            for position in positions.iter_mut() {
                *position = shift_position(*position, batch);
            }
        }
    }
}

impl<E: Editor> Editor for EditLog<'_, E> {
    fn settings(&self) -> Settings {
        self.editor.settings()
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.editor.workspace_root()
    }

    fn document_lines(&self, uri: &str) -> Option<Vec<String>> {
        self.editor.document_lines(uri)
    }

    async fn find_candidate_files(&self, short_name: &str) -> Vec<PathBuf> {
        self.editor.find_candidate_files(short_name).await
    }

    async fn open_document(&self, path: &Path) -> Option<Vec<String>> {
        self.editor.open_document(path).await
    }

    async fn prompt_choice(&self, options: &[String]) -> Option<String> {
        self.editor.prompt_choice(options).await
    }

    async fn prompt_text(&self, placeholder: &str) -> Option<String> {
        self.editor.prompt_text(placeholder).await
    }

    async fn apply_edits(&self, uri: &str, edits: Vec<TextEdit>) -> bool {
        let applied = self.editor.apply_edits(uri, edits.clone()).await;
        if applied {
            self.applied
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(edits);
        }
        applied
    }

    async fn notify(&self, message: &str, is_error: bool) {
        self.editor.notify(message, is_error).await
    }

    async fn status_message(&self, message: &str) {
        self.editor.status_message(message).await
    }
}

/// Show `message` in the status bar, or as a notification without its icon.
pub async fn show_message<E: Editor>(editor: &E, message: &str, is_error: bool) {
    if editor.settings().show_message_on_status_bar {
        editor.status_message(message).await;
        return;
    }
    let message = ICON.replace(message, "");
    editor
        .notify(&format!("{}{}", MESSAGE_PREFIX, message), is_error)
        .await;
}

pub async fn report_error<E: Editor>(editor: &E, err: &ResolverError) {
    tracing::info!("Command failed: {}", err);
    show_message(editor, &err.to_string(), true).await;
}
