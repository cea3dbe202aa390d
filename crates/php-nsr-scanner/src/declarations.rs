//! Declaration block scanning.
//!
//! A single forward pass over the lines of a document locates the opening
//! tag, `declare`, `namespace`, the `use` statements and the first type
//! declaration. Every import decision is based on this pass, so it is re-run
//! for each command.

use php_nsr_types::{DeclarationLines, ResolverError, UseStatement};
use regex::Regex;
use std::sync::LazyLock;

static TYPE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(class|trait|interface)\s+\w+").unwrap());

/// Scan `lines` for the declaration block.
///
/// When `stop_at_class` is given, a line reading exactly
/// `use <stop_at_class>;` aborts the scan with
/// [`ResolverError::AlreadyImported`].
pub fn scan_declarations<S: AsRef<str>>(
    lines: &[S],
    stop_at_class: Option<&str>,
) -> Result<(Vec<UseStatement>, DeclarationLines), ResolverError> {
    let stop_line = stop_at_class.map(|fqcn| format!("use {};", fqcn));
    let mut use_statements = Vec::new();
    let mut declarations = DeclarationLines::default();

    for (idx, line) in lines.iter().enumerate() {
        let text = line.as_ref();
        let number = idx as u32 + 1;

        if let (Some(stop), Some(fqcn)) = (&stop_line, stop_at_class) {
            if text == stop {
                return Err(ResolverError::AlreadyImported {
                    fqcn: fqcn.to_string(),
                });
            }
        }

        if declarations.is_complete() {
            break;
        }

        if let Some(rest) = text.strip_prefix("<?php") {
            declarations.opening_tag.get_or_insert(number);
            // `<?php namespace App;` declares both on one line
            if rest.starts_with(char::is_whitespace) && rest.trim_start().starts_with("namespace ")
            {
                declarations.namespace.get_or_insert(number);
            }
        } else if text.starts_with("declare") {
            declarations.declare.get_or_insert(number);
        } else if text.starts_with("namespace ") {
            declarations.namespace.get_or_insert(number);
        } else if text.starts_with("use ") {
            use_statements.push(UseStatement::new(text, idx as u32));
            declarations.last_use_statement = Some(number);
        } else if TYPE_DECLARATION.is_match(text) {
            declarations.first_type_declaration.get_or_insert(number);
        }
    }

    tracing::debug!(
        "Scanned declarations: {} use statements, {:?}",
        use_statements.len(),
        declarations
    );

    Ok((use_statements, declarations))
}
