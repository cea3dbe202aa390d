//! Import planning: where a `use` statement goes and what it looks like.

use php_nsr_types::{DeclarationLines, TextEdit, UseStatement};
use regex::Regex;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());
static USE_SHORT_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)?;").unwrap());

/// Last identifier of a fully qualified name: `App\Models\User` → `User`.
pub fn class_base_name(fqcn: &str) -> &str {
    WORD.find_iter(fqcn).last().map_or(fqcn, |m| m.as_str())
}

/// Name a `use` line makes available: the alias if any, else the class base
/// name.
pub fn use_short_name(text: &str) -> Option<&str> {
    USE_SHORT_NAME
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether some existing import already provides `name`.
pub fn has_conflict(use_statements: &[UseStatement], name: &str) -> bool {
    use_statements
        .iter()
        .any(|u| use_short_name(&u.text) == Some(name))
}

/// How a class gets imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportPlan {
    /// Add `use <fqcn>;`.
    Insert,
    /// The selection held a qualified name: shorten it to `base_name`, then
    /// add the import.
    ReplaceSelectionThenInsert { base_name: String },
    /// The base name is already taken: ask for an alias or replace the
    /// existing import.
    AliasOrReplace,
}

pub fn plan_import(
    fqcn: &str,
    replace_selection: bool,
    use_statements: &[UseStatement],
) -> ImportPlan {
    let base_name = class_base_name(fqcn);
    if has_conflict(use_statements, base_name) {
        ImportPlan::AliasOrReplace
    } else if replace_selection {
        ImportPlan::ReplaceSelectionThenInsert {
            base_name: base_name.to_string(),
        }
    } else {
        ImportPlan::Insert
    }
}

/// Line a new `use` statement is inserted at, with the text surrounding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    pub line: u32,
    pub prepend: &'static str,
    pub append: &'static str,
}

pub fn insertion_point(declarations: &DeclarationLines) -> InsertionPoint {
    let DeclarationLines {
        opening_tag,
        namespace,
        last_use_statement,
        first_type_declaration,
        ..
    } = *declarations;

    let (line, prepend) = match (last_use_statement, namespace) {
        (Some(last_use), _) => (last_use, ""),
        (None, Some(ns)) => (ns, "\n"),
        (None, None) => (
            opening_tag.unwrap_or(0),
            if opening_tag.is_some() { "\n" } else { "" },
        ),
    };

    // keep one blank line before a type declaration that follows directly
    let crowded = first_type_declaration.is_some_and(|class_line| {
        [last_use_statement, namespace, opening_tag]
            .iter()
            .any(|above| i64::from(class_line) - i64::from(above.unwrap_or(0)) <= 1)
    });

    InsertionPoint {
        line,
        prepend,
        append: if crowded { "\n\n" } else { "\n" },
    }
}

/// Edit adding `use <fqcn>[ as <alias>];` to the declaration block.
pub fn insert_use_edit(
    fqcn: &str,
    alias: Option<&str>,
    declarations: &DeclarationLines,
) -> TextEdit {
    let point = insertion_point(declarations);
    let alias = alias.map(|a| format!(" as {}", a)).unwrap_or_default();
    TextEdit::insert(
        point.line,
        0,
        format!("{}use {}{};{}", point.prepend, fqcn, alias, point.append),
    )
}

/// Edit replacing the import that clashes with `fqcn` by `use <fqcn>;`.
pub fn replace_use_edit(fqcn: &str, use_statements: &[UseStatement]) -> Option<TextEdit> {
    let base_name = class_base_name(fqcn);
    let existing = use_statements
        .iter()
        .find(|u| use_short_name(&u.text) == Some(base_name))?;
    Some(TextEdit::replace_line(
        existing.line,
        &existing.text,
        format!("use {};", fqcn),
    ))
}

/// Outcome of the alias prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasDecision {
    Cancel,
    Conflict(String),
    ReplaceExisting,
    UseAlias(String),
}

pub fn resolve_alias(answer: Option<String>, use_statements: &[UseStatement]) -> AliasDecision {
    match answer {
        None => AliasDecision::Cancel,
        Some(alias) if alias.is_empty() => AliasDecision::ReplaceExisting,
        Some(alias) if has_conflict(use_statements, &alias) => AliasDecision::Conflict(alias),
        Some(alias) => AliasDecision::UseAlias(alias),
    }
}
