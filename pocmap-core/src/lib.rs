pub mod aggregate;
pub mod dispatch;
pub mod engine;
pub mod group;
pub mod target;

pub use aggregate::{AggregateError, Report, parse_artifact, parse_finding};
pub use dispatch::{Dispatcher, WaveSummary};
pub use engine::{RunReport, ScanEngine};
pub use group::{group_records, group_rows, parse_rows};
pub use target::{TargetError, clean_target_file, clean_targets, extract_base_url};
