//! Composer.json parsing for PSR-4 namespace mapping.
//!
//! Only the `psr-4` tables of `autoload` and `autoload-dev` are read; the
//! other autoload kinds never contribute a namespace.

use php_nsr_types::ResolverError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the composer manifest.
pub const MANIFEST_FILE: &str = "composer.json";

/// PSR-4 mapping: namespace prefix → base directories relative to the
/// project root, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Psr4Map {
    pub entries: Vec<(String, Vec<String>)>,
}

impl Psr4Map {
    /// Parse manifest JSON, merging `autoload-dev` over `autoload`.
    pub fn from_manifest(content: &str) -> Result<Self, ResolverError> {
        let composer: ComposerJson = serde_json::from_str(content)
            .map_err(|e| ResolverError::InvalidManifest(e.to_string()))?;

        if composer.autoload.is_none() && composer.autoload_dev.is_none() {
            return Err(ResolverError::NoAutoloadConfig);
        }

        let mut map = Psr4Map::default();
        for section in [composer.autoload, composer.autoload_dev]
            .into_iter()
            .flatten()
        {
            for (prefix, value) in section.psr4 {
                let value: Psr4Value = serde_json::from_value(value).map_err(|e| {
                    ResolverError::InvalidManifest(format!("psr-4 entry {:?}: {}", prefix, e))
                })?;
                map.insert(prefix, value.into_dirs());
            }
        }

        if map.is_empty() {
            return Err(ResolverError::NoPsr4Entry);
        }
        Ok(map)
    }

    /// Add a prefix mapping. An existing prefix keeps its position and gets
    /// the new directories.
    pub fn insert(&mut self, prefix: String, dirs: Vec<String>) {
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = dirs,
            None => self.entries.push((prefix, dirs)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every (prefix, base directory) pair in map order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(prefix, dirs)| dirs.iter().map(move |d| (prefix.as_str(), d.as_str())))
    }
}

/// Partial composer.json schema (only what we need).
#[derive(Debug, Deserialize, Default)]
struct ComposerJson {
    #[serde(default)]
    autoload: Option<AutoloadSection>,
    #[serde(default, rename = "autoload-dev")]
    autoload_dev: Option<AutoloadSection>,
}

#[derive(Debug, Deserialize, Default)]
struct AutoloadSection {
    /// Kept as a JSON object so prefixes stay in manifest order.
    #[serde(default, rename = "psr-4")]
    psr4: serde_json::Map<String, serde_json::Value>,
}

/// PSR-4 value can be a string or array of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Psr4Value {
    Single(String),
    Multiple(Vec<String>),
}

impl Psr4Value {
    fn into_dirs(self) -> Vec<String> {
        match self {
            Psr4Value::Single(s) => vec![s],
            Psr4Value::Multiple(v) => v,
        }
    }
}

/// Directories that may hold the manifest for `file_path`: its own directory
/// and every parent up to and including `workspace_root`, nearest first.
pub fn manifest_search_dirs(
    file_path: &Path,
    workspace_root: &Path,
) -> Result<Vec<PathBuf>, ResolverError> {
    let start = file_path.parent().unwrap_or(file_path);
    if !start.starts_with(workspace_root) {
        return Err(ResolverError::ManifestNotFound);
    }

    let mut dirs = Vec::new();
    for dir in start.ancestors() {
        dirs.push(dir.to_path_buf());
        if dir == workspace_root {
            break;
        }
    }
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_psr4() {
        let json = r#"{
            "autoload": {
                "psr-4": {
                    "App\\": "src/"
                }
            }
        }"#;
        let map = Psr4Map::from_manifest(json).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries[0].0, "App\\");
        assert_eq!(map.entries[0].1, vec!["src/".to_string()]);
    }

    #[test]
    fn test_parse_psr4_with_dev() {
        let json = r#"{
            "autoload": {
                "psr-4": {
                    "App\\": "src/"
                }
            },
            "autoload-dev": {
                "psr-4": {
                    "App\\Tests\\": "tests/"
                }
            }
        }"#;
        let map = Psr4Map::from_manifest(json).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_dev_overrides_same_prefix() {
        let json = r#"{
            "autoload": { "psr-4": { "App\\": "src/", "Lib\\": "lib/" } },
            "autoload-dev": { "psr-4": { "App\\": "dev/" } }
        }"#;
        let map = Psr4Map::from_manifest(json).unwrap();
        assert_eq!(
            map.entries,
            vec![
                ("App\\".to_string(), vec!["dev/".to_string()]),
                ("Lib\\".to_string(), vec!["lib/".to_string()]),
            ]
        );
    }

    #[test]
    fn test_prefixes_keep_manifest_order() {
        let json = r#"{
            "autoload": { "psr-4": { "Zed\\": "src/", "App\\": "src/" } },
            "autoload-dev": { "psr-4": { "Tests\\": "tests/", "Bench\\": "bench/" } }
        }"#;
        let map = Psr4Map::from_manifest(json).unwrap();
        let prefixes: Vec<&str> = map.entries.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(prefixes, vec!["Zed\\", "App\\", "Tests\\", "Bench\\"]);
    }

    #[test]
    fn test_parse_multiple_dirs() {
        let json = r#"{
            "autoload": {
                "psr-4": {
                    "App\\": ["src/", "lib/"]
                }
            }
        }"#;
        let map = Psr4Map::from_manifest(json).unwrap();
        let pairs: Vec<_> = map.pairs().collect();
        assert_eq!(pairs, vec![("App\\", "src/"), ("App\\", "lib/")]);
    }

    #[test]
    fn test_manifest_errors() {
        assert!(matches!(
            Psr4Map::from_manifest("{ not json"),
            Err(ResolverError::InvalidManifest(_))
        ));
        assert_eq!(
            Psr4Map::from_manifest(r#"{"name": "acme/app"}"#),
            Err(ResolverError::NoAutoloadConfig)
        );
        assert_eq!(
            Psr4Map::from_manifest(r#"{"autoload": {"classmap": ["lib/"]}}"#),
            Err(ResolverError::NoPsr4Entry)
        );
        assert!(matches!(
            Psr4Map::from_manifest(r#"{"autoload": {"psr-4": {"App\\": 42}}}"#),
            Err(ResolverError::InvalidManifest(_))
        ));
    }

    #[test]
    fn test_manifest_search_dirs() {
        let dirs = manifest_search_dirs(
            Path::new("/project/src/Http/Foo.php"),
            Path::new("/project"),
        )
        .unwrap();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/project/src/Http"),
                PathBuf::from("/project/src"),
                PathBuf::from("/project"),
            ]
        );

        assert_eq!(
            manifest_search_dirs(Path::new("/elsewhere/Foo.php"), Path::new("/project")),
            Err(ResolverError::ManifestNotFound)
        );
    }
}
