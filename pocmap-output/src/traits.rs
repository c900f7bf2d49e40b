use std::path::PathBuf;

use pocmap_types::Finding;

/// Trait for serializing a finished report.
pub trait OutputFormatter: Send + Sync {
    fn format(&self, findings: &[Finding]) -> Result<Vec<u8>, OutputError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("formatting error: {0}")]
    FormatError(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("input table not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("failed to read table: {0}")]
    Table(#[from] calamine::Error),
    #[error("sheet '{sheet}' not found in {}", path.display())]
    MissingSheet { path: PathBuf, sheet: String },
}
