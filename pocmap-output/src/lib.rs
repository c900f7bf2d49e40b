pub mod config;
pub mod csv;
pub mod input;
pub mod json;
pub mod manager;
pub mod summary;
pub mod traits;
pub mod xlsx;

pub use config::{OutputConfig, OutputFormat, OutputSpec};
pub use input::{DEFAULT_INPUT_SHEET, read_table};
pub use manager::OutputManager;
pub use summary::{render_summary, severity_counts};
pub use traits::{OutputError, OutputFormatter};

/// Report column headers, in order.
pub const REPORT_HEADERS: [&str; 4] = ["URL", "PoC", "Template", "Severity"];
