use std::collections::BTreeSet;
use std::fmt;

use pocmap_types::CheckRef;

/// Where a candidate check came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Remote advisory search narrowed to definitions present locally.
    Remote,
    /// Advisory-prefixed definitions whose name contains the fingerprint.
    Advisory,
    /// Any definition whose path contains the fingerprint.
    Keyword,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Advisory => write!(f, "advisory"),
            Self::Keyword => write!(f, "keyword"),
        }
    }
}

/// Deduplicated union of the checks contributed by every source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    checks: BTreeSet<CheckRef>,
    /// Checks contributed by each source before deduplication.
    pub remote: usize,
    pub advisory: usize,
    pub keyword: usize,
}

impl Resolution {
    pub fn extend(&mut self, kind: SourceKind, refs: Vec<CheckRef>) {
        let counter = match kind {
            SourceKind::Remote => &mut self.remote,
            SourceKind::Advisory => &mut self.advisory,
            SourceKind::Keyword => &mut self.keyword,
        };
        *counter += refs.len();
        self.checks.extend(refs);
    }

    pub fn checks(&self) -> &BTreeSet<CheckRef> {
        &self.checks
    }

    pub fn contains(&self, check: &CheckRef) -> bool {
        self.checks.contains(check)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl FromIterator<CheckRef> for Resolution {
    fn from_iter<I: IntoIterator<Item = CheckRef>>(iter: I) -> Self {
        let mut resolution = Self::default();
        resolution.extend(SourceKind::Keyword, iter.into_iter().collect());
        resolution
    }
}
