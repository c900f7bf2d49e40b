pub mod check;
pub mod finding;
pub mod target;

pub use check::{CheckRef, ScanTask};
pub use finding::Finding;
pub use target::{Fingerprint, GroupKind, TargetGroups, TargetRecord};

/// Default number of scan tasks allowed to execute at once.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default number of identifiers kept from one remote advisory search.
pub const DEFAULT_SEARCH_RESULTS: usize = 5;
