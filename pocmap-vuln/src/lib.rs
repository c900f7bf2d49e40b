pub mod error;
pub mod remote;
pub mod resolver;
pub mod store;
pub mod types;

pub use error::SourceError;
pub use remote::{AdvisorySearch, CirclSearch, DEFAULT_SEARCH_ENDPOINT, OfflineSearch};
pub use resolver::{CheckResolver, ResolveChecks};
pub use store::DefinitionStore;
pub use types::{Resolution, SourceKind};
