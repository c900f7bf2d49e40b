// ---------------------------------------------------------------------------
// Local check-definition store
// ---------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use pocmap_types::CheckRef;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::SourceError;

pub const DEFAULT_ADVISORY_PREFIX: &str = "CNVD";
pub const DEFAULT_EXTENSION: &str = "yaml";

/// A directory tree of check definitions.
///
/// Identifier-named definitions live directly in `advisory_dir`, which is
/// normally a subdirectory of `root`.
#[derive(Debug, Clone)]
pub struct DefinitionStore {
    root: PathBuf,
    advisory_dir: PathBuf,
    advisory_prefix: String,
    extension: String,
}

impl DefinitionStore {
    pub fn new(root: impl Into<PathBuf>, advisory_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            advisory_dir: advisory_dir.into(),
            advisory_prefix: DEFAULT_ADVISORY_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_advisory_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.advisory_prefix = prefix.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn advisory_dir(&self) -> &Path {
        &self.advisory_dir
    }

    /// Map identifiers to definitions already present in the advisory
    /// directory. Identifiers without a local definition contribute nothing.
    pub fn lookup_ids(&self, ids: &[String]) -> Vec<CheckRef> {
        ids.iter()
            .filter(|id| is_safe_identifier(id))
            .map(|id| self.advisory_dir.join(format!("{id}.{}", self.extension)))
            .filter(|path| path.is_file())
            .map(CheckRef::new)
            .collect()
    }

    /// Advisory-prefixed definitions whose file name contains `keyword`.
    pub fn advisory_matches(&self, keyword: &str) -> Result<Vec<CheckRef>, SourceError> {
        let keyword = keyword.to_lowercase();
        let entries = std::fs::read_dir(&self.advisory_dir).map_err(|e| SourceError::Io {
            path: self.advisory_dir.clone(),
            source: e,
        })?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SourceError::Io {
                path: self.advisory_dir.clone(),
                source: e,
            })?;
            if !entry.file_type().is_ok_and(|ft| ft.is_file()) {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&self.advisory_prefix) && name.to_lowercase().contains(&keyword) {
                found.push(CheckRef::new(entry.path()));
            }
        }

        found.sort();
        Ok(found)
    }

    /// Every definition under the root whose path relative to the root
    /// contains `keyword`, compared case-insensitively.
    ///
    /// The root itself is not part of the compared path, so a keyword that
    /// only occurs in the root (`poc` for the default root) matches nothing
    /// rather than every definition.
    pub fn keyword_matches(&self, keyword: &str) -> Result<Vec<CheckRef>, SourceError> {
        let keyword = keyword.to_lowercase();
        std::fs::read_dir(&self.root).map_err(|e| SourceError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(SourceError::Walk {
                        path: self.root.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    debug!(error = %e, "skipping unreadable definition entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.has_extension(entry.path()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path());
            if relative.to_string_lossy().to_lowercase().contains(&keyword) {
                found.push(CheckRef::new(entry.path()));
            }
        }

        found.sort();
        Ok(found)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }
}

/// Identifiers come from a remote service and become file names, so
/// anything that could escape the advisory directory is dropped.
fn is_safe_identifier(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "id: test\n").unwrap();
    }

    fn fixture() -> (tempfile::TempDir, DefinitionStore) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("poc");
        let cve = root.join("cve");
        touch(&cve.join("CVE-2021-1111.yaml"));
        touch(&cve.join("CVE-2022-2222.yaml"));
        touch(&cve.join("CNVD-2020-ThinkPHP-rce.yaml"));
        touch(&cve.join("cnvd-2020-thinkphp-lower.yaml"));
        touch(&cve.join("CNVD-2019-weblogic.yaml"));
        touch(&root.join("thinkphp").join("thinkphp-5-rce.yaml"));
        touch(&root.join("misc").join("ThinkPHP-debug.yml"));
        touch(&root.join("misc").join("nginx-status.yaml"));
        let store = DefinitionStore::new(&root, &cve);
        (dir, store)
    }

    #[test]
    fn lookup_ids_only_returns_existing_definitions() {
        let (_dir, store) = fixture();
        let found = store.lookup_ids(&[
            "CVE-2021-1111".into(),
            "CVE-2099-0000".into(),
            "CVE-2022-2222".into(),
        ]);
        let ids: Vec<String> = found.iter().map(CheckRef::id).collect();
        assert_eq!(ids, vec!["CVE-2021-1111", "CVE-2022-2222"]);
    }

    #[test]
    fn lookup_ids_rejects_traversal() {
        let (_dir, store) = fixture();
        assert!(store.lookup_ids(&["../cve/CVE-2021-1111".into()]).is_empty());
    }

    #[test]
    fn advisory_matches_require_case_sensitive_prefix() {
        let (_dir, store) = fixture();
        let found = store.advisory_matches("thinkphp").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].basename(), "CNVD-2020-ThinkPHP-rce.yaml");
    }

    #[test]
    fn advisory_matches_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DefinitionStore::new(dir.path(), dir.path().join("absent"));
        assert!(matches!(
            store.advisory_matches("nginx"),
            Err(SourceError::Io { .. })
        ));
    }

    #[test]
    fn keyword_matches_walk_tree_with_extension_filter() {
        let (_dir, store) = fixture();
        let names: Vec<String> = store
            .keyword_matches("thinkphp")
            .unwrap()
            .iter()
            .map(CheckRef::basename)
            .collect();
        assert!(names.contains(&"CNVD-2020-ThinkPHP-rce.yaml".to_string()));
        assert!(names.contains(&"cnvd-2020-thinkphp-lower.yaml".to_string()));
        assert!(names.contains(&"thinkphp-5-rce.yaml".to_string()));
        // wrong extension
        assert!(!names.contains(&"ThinkPHP-debug.yml".to_string()));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn keyword_matches_directory_names() {
        let (_dir, store) = fixture();
        let found = store.keyword_matches("misc").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].basename(), "nginx-status.yaml");
    }

    #[test]
    fn keyword_in_root_path_matches_nothing() {
        let (_dir, store) = fixture();
        assert!(store.keyword_matches("poc").unwrap().is_empty());
    }

    #[test]
    fn keyword_matches_missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let store = DefinitionStore::new(&missing, missing.join("cve"));
        assert!(store.keyword_matches("nginx").is_err());
    }

    #[test]
    fn sources_agree_on_check_identity() {
        let (_dir, store) = fixture();
        let by_id = store.lookup_ids(&["CVE-2021-1111".into()]);
        let by_keyword = store.keyword_matches("cve-2021-1111").unwrap();
        assert_eq!(by_id, by_keyword);
    }

    #[test]
    fn extension_builder_strips_dot() {
        let store = DefinitionStore::new("a", "a/b").with_extension(".yml");
        assert!(store.has_extension(Path::new("x.yml")));
        assert!(!store.has_extension(Path::new("x.yaml")));
    }
}
