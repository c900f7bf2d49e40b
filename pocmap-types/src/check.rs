use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Handle to a check definition on disk.
///
/// Two handles are equal when their paths are equal, which is what the
/// resolver deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckRef(PathBuf);

impl CheckRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Definition file name, e.g. `CVE-2021-1111.yaml`.
    pub fn basename(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Definition identifier: the file name without its extension.
    pub fn id(&self) -> String {
        self.0
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for CheckRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One (target, check) pair scheduled by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    pub target: String,
    pub check: CheckRef,
    /// Run-unique sequence number.
    pub seq: u64,
}

impl ScanTask {
    pub fn new(target: impl Into<String>, check: CheckRef, seq: u64) -> Self {
        Self {
            target: target.into(),
            check,
            seq,
        }
    }
}
