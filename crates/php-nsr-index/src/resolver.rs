//! Short class name → fully qualified candidates.
//!
//! The files declaring a class are found by name (`Foo.php` declares `Foo`),
//! and the namespace each of them declares gives one candidate.

use crate::builtins::is_builtin_class;
use php_nsr_types::{CandidateNamespaces, ResolverError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NAMESPACE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:namespace|<\?php namespace)\s+(.+?)\s*;").unwrap());

/// A file that may declare the class being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDocument {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl CandidateDocument {
    pub fn new(path: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        CandidateDocument {
            path: path.into(),
            lines,
        }
    }
}

/// Whether the file at `path` is named after `short_name`: the file name up
/// to its first `.` must equal it exactly.
pub fn is_candidate_file(path: &Path, short_name: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .is_some_and(|stem| stem == short_name)
}

/// The namespace declared by a document, if any.
pub fn declared_namespace<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    lines.iter().find_map(|line| {
        NAMESPACE_DECLARATION
            .captures(line.as_ref())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Collect the fully qualified names `short_name` may refer to.
pub fn resolve_namespaces(
    short_name: &str,
    documents: &[CandidateDocument],
) -> Result<CandidateNamespaces, ResolverError> {
    let mut candidates = CandidateNamespaces::new();

    for document in documents {
        if let Some(namespace) = declared_namespace(&document.lines) {
            let fqcn = format!("{}\\{}", namespace, short_name);
            tracing::debug!("Found {} in {}", fqcn, document.path.display());
            candidates.push(fqcn);
        }
    }

    if is_builtin_class(short_name) {
        candidates.prepend(short_name);
    }

    // declared without a namespace
    if candidates.is_empty() && !documents.is_empty() {
        candidates.push(short_name);
    }

    if candidates.is_empty() {
        return Err(ResolverError::ClassNotFound {
            class_name: short_name.to_string(),
        });
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, source: &str) -> CandidateDocument {
        CandidateDocument::new(path, source.lines().map(String::from).collect())
    }

    #[test]
    fn test_is_candidate_file() {
        assert!(is_candidate_file(Path::new("/app/src/User.php"), "User"));
        assert!(is_candidate_file(Path::new("/app/views/User.blade.php"), "User"));
        assert!(!is_candidate_file(Path::new("/app/src/UserPolicy.php"), "User"));
        assert!(!is_candidate_file(Path::new("/app/src/user.php"), "User"));
    }

    #[test]
    fn test_declared_namespace() {
        assert_eq!(
            declared_namespace(&["<?php", "", "namespace App\\Models;", "class User {}"]),
            Some("App\\Models".to_string())
        );
        assert_eq!(
            declared_namespace(&["<?php namespace App\\Http;"]),
            Some("App\\Http".to_string())
        );
        assert_eq!(declared_namespace(&["<?php", "class User {}"]), None);
        // indented lines are not declarations
        assert_eq!(declared_namespace(&["    namespace Foo;"]), None);
    }

    #[test]
    fn test_resolve_multiple_documents_in_order() {
        let docs = vec![
            doc("/a/User.php", "<?php\nnamespace App\\Models;\nclass User {}\n"),
            doc("/b/User.php", "<?php\nnamespace Legacy;\nclass User {}\n"),
            doc("/c/User.php", "<?php\nnamespace App\\Models;\nclass User {}\n"),
        ];
        let candidates = resolve_namespaces("User", &docs).unwrap();
        assert_eq!(
            candidates.as_slice(),
            &["App\\Models\\User".to_string(), "Legacy\\User".to_string()]
        );
    }

    #[test]
    fn test_first_namespace_per_document_wins() {
        let docs = vec![doc(
            "/a/User.php",
            "<?php\nnamespace First;\nnamespace Second;\nclass User {}\n",
        )];
        let candidates = resolve_namespaces("User", &docs).unwrap();
        assert_eq!(candidates.single(), Some("First\\User"));
    }

    #[test]
    fn test_builtin_is_listed_first() {
        let docs = vec![doc(
            "/vendor/Carbon/DateTime.php",
            "<?php\nnamespace Carbon;\nclass DateTime {}\n",
        )];
        let candidates = resolve_namespaces("DateTime", &docs).unwrap();
        assert_eq!(
            candidates.as_slice(),
            &["DateTime".to_string(), "Carbon\\DateTime".to_string()]
        );

        let candidates = resolve_namespaces("DateTime", &[]).unwrap();
        assert_eq!(candidates.single(), Some("DateTime"));
    }

    #[test]
    fn test_global_class_without_namespace() {
        let docs = vec![doc("/lib/Helper.php", "<?php\nclass Helper {}\n")];
        let candidates = resolve_namespaces("Helper", &docs).unwrap();
        assert_eq!(candidates.single(), Some("Helper"));
    }

    #[test]
    fn test_class_not_found() {
        assert_eq!(
            resolve_namespaces("Missing", &[]),
            Err(ResolverError::ClassNotFound {
                class_name: "Missing".into()
            })
        );
    }
}
