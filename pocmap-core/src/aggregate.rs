use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use pocmap_types::Finding;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// The task produced no artifact, which means no findings.
    #[error("artifact not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Append-only list of findings shared by every ingesting caller.
///
/// Order follows ingestion order; each finding is self-contained so the
/// order carries no meaning.
#[derive(Debug, Default)]
pub struct Report {
    findings: Mutex<Vec<Finding>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Finding>> {
        self.findings.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn append(&self, finding: Finding) {
        self.lock().push(finding);
    }

    /// Parse one artifact and append its findings under a single lock.
    /// Returns the number of findings added.
    pub fn ingest(&self, artifact: &Path) -> Result<usize, AggregateError> {
        let content = std::fs::read(artifact).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AggregateError::Missing(artifact.to_path_buf())
            } else {
                AggregateError::Read {
                    path: artifact.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let parsed = parse_artifact(&String::from_utf8_lossy(&content));
        let count = parsed.len();
        self.lock().extend(parsed);
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the findings collected so far.
    pub fn snapshot(&self) -> Vec<Finding> {
        self.lock().clone()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse every line of an artifact, skipping blank, malformed or
/// incomplete records.
pub fn parse_artifact(content: &str) -> Vec<Finding> {
    content.lines().filter_map(parse_finding).collect()
}

/// Parse one JSON record. Records without `host` or `template-id` yield
/// `None`; `info.severity` is passed through verbatim.
pub fn parse_finding(line: &str) -> Option<Finding> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(line).ok()?;

    let host = value
        .get("host")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())?;
    let template_id = value
        .get("template-id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())?;
    let severity = value
        .pointer("/info/severity")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    let finding = Finding::new(host, template_id, severity);
    Some(
        match value
            .get("template-path")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
        {
            Some(path) => finding.with_template(path),
            None => finding,
        },
    )
}
