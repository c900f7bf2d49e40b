use std::fs;
use std::path::Path;

use crate::config::{OutputConfig, OutputFormat};
use crate::csv::CsvFormatter;
use crate::json::JsonFormatter;
use crate::summary::render_summary;
use crate::traits::{OutputError, OutputFormatter};
use crate::xlsx::XlsxFormatter;
use pocmap_types::Finding;

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    for component in path.components() {
        if matches!(component, std::path::Component::ParentDir) {
            return Err(OutputError::FormatError(format!(
                "output path '{}' must not contain '..' components",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Coordinates output to stdout and/or multiple file destinations.
pub struct OutputManager {
    config: OutputConfig,
}

impl OutputManager {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Format the findings and write to all configured destinations.
    /// Existing files are overwritten.
    pub fn run(&self, findings: &[Finding]) -> Result<(), OutputError> {
        for spec in &self.config.outputs {
            validate_output_path(&spec.path)?;
            let output = formatter_for(spec.format).format(findings)?;
            if let Some(parent) = spec.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(&spec.path, &output).map_err(|e| {
                OutputError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to write {}: {}", spec.path.display(), e),
                ))
            })?;
            tracing::info!(
                path = %spec.path.display(),
                findings = findings.len(),
                "report written"
            );
        }

        if self.config.stdout {
            let destination = self.config.outputs.first().map(|s| s.path.as_path());
            print!("{}", render_summary(findings, destination));
        }

        Ok(())
    }
}

fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Xlsx => Box::new(XlsxFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputSpec;
    use std::path::PathBuf;

    #[test]
    fn rejects_parent_dir_components() {
        let manager = OutputManager::new(OutputConfig {
            outputs: vec![OutputSpec::for_path("../escape.xlsx")],
            stdout: false,
        });
        let err = manager.run(&[]).unwrap_err();
        assert!(matches!(err, OutputError::FormatError(_)));
    }

    #[test]
    fn writes_every_destination_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("out/report.csv");
        let xlsx = dir.path().join("report.xlsx");
        fs::write(&xlsx, b"stale").unwrap();

        let manager = OutputManager::new(OutputConfig {
            outputs: vec![OutputSpec::for_path(csv.clone()), OutputSpec::for_path(xlsx.clone())],
            stdout: false,
        });
        let findings = vec![Finding::new("http://a:80", "CVE-1", "medium")];
        manager.run(&findings).unwrap();

        let text = fs::read_to_string(&csv).unwrap();
        assert!(text.contains("http://a:80,CVE-1,CVE-1,medium"));
        let bytes = fs::read(&xlsx).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_report_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("empty.json");
        OutputManager::new(OutputConfig {
            outputs: vec![OutputSpec::for_path(path.clone())],
            stdout: false,
        })
        .run(&[])
        .unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}
