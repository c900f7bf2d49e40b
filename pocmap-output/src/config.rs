use std::path::{Path, PathBuf};

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    /// Pick a format from the destination's extension. Anything
    /// unrecognised is written as a workbook.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            _ => Self::Xlsx,
        }
    }
}

/// A single output destination: format + file path.
#[derive(Debug, Clone)]
pub struct OutputSpec {
    pub format: OutputFormat,
    pub path: PathBuf,
}

impl OutputSpec {
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            format: OutputFormat::from_path(&path),
            path,
        }
    }
}

/// Where the report goes.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub outputs: Vec<OutputSpec>,
    /// Print a severity summary to stdout.
    pub stdout: bool,
}
