use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use pocmap_types::Finding;

/// Count findings per severity string as reported. An empty severity is
/// counted as "unknown".
pub fn severity_counts(findings: &[Finding]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for f in findings {
        let key = if f.severity.trim().is_empty() {
            "unknown".to_string()
        } else {
            f.severity.clone()
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Short human-readable summary printed when a run finishes.
pub fn render_summary(findings: &[Finding], destination: Option<&Path>) -> String {
    let mut out = String::new();
    let _ = write!(out, "found {} vulnerabilities", findings.len());
    if let Some(path) = destination {
        let _ = write!(out, ", saved to {}", path.display());
    }
    out.push('\n');
    for (severity, count) in severity_counts(findings) {
        let _ = writeln!(out, "  {severity:<10} {count}");
    }
    out
}
