use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// One row of the fingerprint table after trimming and lowercasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub url: String,
    /// CMS label, lowercased. May be empty.
    pub cms: String,
    /// Server banner label, lowercased. May be empty.
    pub server: String,
}

impl TargetRecord {
    /// Build a record from raw cell text.
    pub fn from_cells(url: &str, cms: &str, server: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            cms: cms.trim().to_lowercase(),
            server: server.trim().to_lowercase(),
        }
    }

    /// Label used for the given grouping, if any.
    pub fn label(&self, kind: GroupKind) -> Option<Fingerprint> {
        match kind {
            GroupKind::Cms => Fingerprint::new(&self.cms),
            GroupKind::Server => Fingerprint::new(&self.server),
        }
    }
}

/// A non-empty lowercase CMS or server keyword.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Normalize `label` into a fingerprint. Returns `None` when the
    /// label is blank.
    pub fn new(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            None
        } else {
            Some(Self(label.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Fingerprint {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which fingerprint column a grouping was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Cms,
    Server,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cms => write!(f, "CMS"),
            Self::Server => write!(f, "Server"),
        }
    }
}

/// Targets keyed by fingerprint for one grouping.
///
/// URLs accumulate in row order and are not deduplicated here; the
/// dispatcher drops repeated URLs when it schedules work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroups {
    pub kind: GroupKind,
    groups: BTreeMap<Fingerprint, Vec<String>>,
}

impl TargetGroups {
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            groups: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, fingerprint: Fingerprint, url: String) {
        self.groups.entry(fingerprint).or_default().push(url);
    }

    pub fn get(&self, fingerprint: &str) -> Option<&[String]> {
        self.groups.get(fingerprint).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &[String])> {
        self.groups.iter().map(|(fp, urls)| (fp, urls.as_slice()))
    }

    /// Number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total URL entries across all fingerprints, repeats included.
    pub fn target_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
