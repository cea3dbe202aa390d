//! Inserting or rewriting the `namespace` statement of a document.

use php_nsr_types::{DeclarationLines, TextEdit};
use regex::{NoExpand, Regex};
use std::sync::LazyLock;

static NAMESPACE_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"namespace (.+)").unwrap());

/// Edit making the document declare `namespace`.
///
/// An existing statement is rewritten in place (text before it on the same
/// line, such as `<?php `, is kept). Otherwise the statement is inserted
/// after the `declare` line, else after the opening tag.
pub fn namespace_edit<S: AsRef<str>>(
    namespace: &str,
    lines: &[S],
    declarations: &DeclarationLines,
) -> TextEdit {
    let statement = format!("namespace {};", namespace);

    if let Some(number) = declarations.namespace {
        let idx = number.saturating_sub(1);
        let current = lines.get(idx as usize).map(|l| l.as_ref()).unwrap_or("");
        let rewritten = NAMESPACE_STATEMENT.replace(current, NoExpand(&statement));
        return TextEdit::replace_line(idx, current, rewritten.trim());
    }

    let line = declarations
        .declare
        .or(declarations.opening_tag)
        .unwrap_or(0);
    TextEdit::insert(line, 0, format!("\n{}\n", statement))
}
