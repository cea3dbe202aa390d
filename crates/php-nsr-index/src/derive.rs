//! Namespace derivation from PSR-4 autoload configuration.

use crate::composer::Psr4Map;
use php_nsr_types::ResolverError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static REPEATED_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\{2,}").unwrap());

/// Namespace a file at `file_path` should declare according to `psr4`.
///
/// The first occurrence of a PSR-4 base directory anywhere in the file's
/// directory (relative to `project_root`) is replaced by its namespace
/// prefix. When several base
/// directories match, the longest one wins.
pub fn derive_namespace(
    file_path: &Path,
    project_root: &Path,
    psr4: &Psr4Map,
) -> Result<String, ResolverError> {
    let dir = file_path.parent().unwrap_or(project_root);
    let relative = relative_dir(dir, project_root)?;

    let mut best: Option<(&str, String)> = None;
    for (prefix, base) in psr4.pairs() {
        let base = normalize_base_dir(base);
        if !relative.contains(base.as_str()) {
            continue;
        }
        if best.as_ref().map_or(true, |(_, b)| base.len() > b.len()) {
            best = Some((prefix, base));
        }
    }

    let Some((prefix, base)) = best else {
        return Err(ResolverError::NoMatchingPsr4Entry {
            path: format!("/{}", relative),
        });
    };

    let remainder = relative
        .replacen(base.as_str(), "", 1)
        .trim_matches('/')
        .replace('/', "\\");
    let prefix = prefix.trim_end_matches('\\');

    let namespace = if remainder.is_empty() || remainder.eq_ignore_ascii_case(prefix) {
        prefix.to_string()
    } else if prefix.is_empty() {
        remainder
    } else {
        format!("{}\\{}", prefix, remainder)
    };

    let namespace = REPEATED_SEPARATORS.replace_all(&namespace, "\\");
    tracing::debug!("Derived namespace {} for {}", namespace, file_path.display());
    Ok(namespace.trim_start_matches('\\').to_string())
}

/// `dir` relative to `root` with forward slashes and a trailing `/`
/// (empty for the root itself).
fn relative_dir(dir: &Path, root: &Path) -> Result<String, ResolverError> {
    let relative = dir
        .strip_prefix(root)
        .map_err(|_| ResolverError::NoMatchingPsr4Entry {
            path: dir.display().to_string(),
        })?;

    let mut out = String::new();
    for component in relative.components() {
        out.push_str(&component.as_os_str().to_string_lossy());
        out.push('/');
    }
    Ok(out)
}

/// `./src` and `src\` both become `src/`; the project root becomes "".
fn normalize_base_dir(base: &str) -> String {
    let base = base.replace('\\', "/");
    let base = base.trim_start_matches("./").trim_matches('/');
    if base.is_empty() || base == "." {
        String::new()
    } else {
        format!("{}/", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &[&str])]) -> Psr4Map {
        let mut map = Psr4Map::default();
        for (prefix, dirs) in entries {
            map.insert(
                prefix.to_string(),
                dirs.iter().map(|d| d.to_string()).collect(),
            );
        }
        map
    }

    #[test]
    fn test_derive_nested_directory() {
        let psr4 = map(&[("App\\", &["app/"])]);
        let ns = derive_namespace(
            Path::new("/project/app/Http/Controllers/UserController.php"),
            Path::new("/project"),
            &psr4,
        )
        .unwrap();
        assert_eq!(ns, "App\\Http\\Controllers");
    }

    #[test]
    fn test_derive_base_directory_itself() {
        let psr4 = map(&[("App\\", &["src/"])]);
        let ns = derive_namespace(
            Path::new("/project/src/Kernel.php"),
            Path::new("/project"),
            &psr4,
        )
        .unwrap();
        assert_eq!(ns, "App");
    }

    #[test]
    fn test_longest_base_directory_wins() {
        let psr4 = map(&[("App\\", &["src/"]), ("App\\Tests\\", &["src/tests/"])]);
        let ns = derive_namespace(
            Path::new("/project/src/tests/Unit/FooTest.php"),
            Path::new("/project"),
            &psr4,
        )
        .unwrap();
        assert_eq!(ns, "App\\Tests\\Unit");
    }

    #[test]
    fn test_empty_prefix_yields_remainder() {
        let psr4 = map(&[("", &["lib/"])]);
        let ns = derive_namespace(
            Path::new("/project/lib/Acme/Util/Str.php"),
            Path::new("/project"),
            &psr4,
        )
        .unwrap();
        assert_eq!(ns, "Acme\\Util");
    }

    #[test]
    fn test_base_directory_spellings() {
        let psr4 = map(&[("Acme\\", &["./src"])]);
        let ns = derive_namespace(
            Path::new("/project/src/Model/User.php"),
            Path::new("/project"),
            &psr4,
        )
        .unwrap();
        assert_eq!(ns, "Acme\\Model");
    }

    #[test]
    fn test_equal_length_tie_keeps_manifest_order() {
        let psr4 = Psr4Map::from_manifest(
            r#"{"autoload": {"psr-4": {"Zed\\": "src/", "App\\": "src/"}}}"#,
        )
        .unwrap();
        let ns = derive_namespace(
            Path::new("/project/src/Foo/Bar.php"),
            Path::new("/project"),
            &psr4,
        )
        .unwrap();
        assert_eq!(ns, "Zed\\Foo");
    }

    #[test]
    fn test_base_directory_matches_inside_path() {
        // `src/` also matches below `packages/acme/`
        let psr4 = map(&[("Pkg\\", &["src/"])]);
        let ns = derive_namespace(
            Path::new("/project/packages/acme/src/Http/Client.php"),
            Path::new("/project"),
            &psr4,
        )
        .unwrap();
        assert_eq!(ns, "Pkg\\packages\\acme\\Http");
    }

    #[test]
    fn test_no_matching_entry() {
        let psr4 = map(&[("App\\", &["src/"])]);
        let err = derive_namespace(
            Path::new("/project/scripts/run.php"),
            Path::new("/project"),
            &psr4,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResolverError::NoMatchingPsr4Entry {
                path: "/scripts/".into()
            }
        );
    }
}
