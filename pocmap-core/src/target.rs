use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("target list not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reduce a raw target to `scheme://host:port`.
///
/// - Input without `://` is returned trimmed but otherwise unchanged.
/// - A missing port becomes 443 for https and 80 for anything else. A port
///   written in the input is kept, even when it is the scheme's default.
/// - Input that contains `://` but does not parse, or has no host, yields
///   `None`.
pub fn extract_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.contains("://") {
        return Some(trimmed.to_string());
    }

    let url = Url::parse(trimmed).ok()?;
    let host = url.host_str().filter(|h| !h.is_empty())?;
    let port = url
        .port()
        .or_else(|| {
            has_explicit_port(trimmed)
                .then(|| url.port_or_known_default())
                .flatten()
        })
        .unwrap_or(if url.scheme() == "https" { 443 } else { 80 });
    Some(format!("{}://{host}:{port}", url.scheme()))
}

/// Whether the authority of `raw` carries a `:port` suffix. `Url::port`
/// hides ports equal to the scheme default.
fn has_explicit_port(raw: &str) -> bool {
    let Some((_, rest)) = raw.split_once("://") else {
        return false;
    };
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let port = match host_port.rsplit_once(']') {
        Some((_, after)) => after.strip_prefix(':'),
        None => host_port.rsplit_once(':').map(|(_, p)| p),
    };
    port.is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

/// Normalize every non-blank line, dropping unparseable targets and
/// repeats. First occurrence wins.
pub fn clean_targets(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .lines()
        .filter_map(extract_base_url)
        .filter(|base| seen.insert(base.clone()))
        .collect()
}

/// Clean the target list at `input` and write the result to every path in
/// `outputs`, creating parent directories as needed.
pub fn clean_target_file(input: &Path, outputs: &[PathBuf]) -> Result<Vec<String>, TargetError> {
    let content = std::fs::read_to_string(input).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TargetError::Missing(input.to_path_buf())
        } else {
            TargetError::Read {
                path: input.to_path_buf(),
                source: e,
            }
        }
    })?;

    let cleaned = clean_targets(&content);
    let joined = cleaned.join("\n");
    for output in outputs {
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| TargetError::Write {
                path: output.clone(),
                source: e,
            })?;
        }
        std::fs::write(output, &joined).map_err(|e| TargetError::Write {
            path: output.clone(),
            source: e,
        })?;
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_passes_through() {
        assert_eq!(extract_base_url("example.com").as_deref(), Some("example.com"));
        assert_eq!(
            extract_base_url("  10.0.0.1:8080 ").as_deref(),
            Some("10.0.0.1:8080")
        );
    }

    #[test]
    fn https_gets_default_port_and_loses_path() {
        assert_eq!(
            extract_base_url("https://example.com/path").as_deref(),
            Some("https://example.com:443")
        );
    }

    #[test]
    fn http_gets_port_80() {
        assert_eq!(
            extract_base_url("http://example.com/a?b=c").as_deref(),
            Some("http://example.com:80")
        );
    }

    #[test]
    fn explicit_port_kept() {
        assert_eq!(
            extract_base_url("http://example.com:8080/x").as_deref(),
            Some("http://example.com:8080")
        );
        assert_eq!(
            extract_base_url("https://example.com:443").as_deref(),
            Some("https://example.com:443")
        );
    }

    #[test]
    fn explicit_default_port_kept_for_other_schemes() {
        assert_eq!(
            extract_base_url("ftp://host:21/pub").as_deref(),
            Some("ftp://host:21")
        );
        assert_eq!(
            extract_base_url("wss://host:443").as_deref(),
            Some("wss://host:443")
        );
        assert_eq!(
            extract_base_url("http://user:pw@host:80/").as_deref(),
            Some("http://host:80")
        );
        assert_eq!(extract_base_url("ftp://host/pub").as_deref(), Some("ftp://host:80"));
        assert_eq!(
            extract_base_url("http://[::1]:80/").as_deref(),
            Some("http://[::1]:80")
        );
    }

    #[test]
    fn unparseable_url_excluded() {
        assert_eq!(extract_base_url("not a url://x"), None);
        assert_eq!(extract_base_url("http://"), None);
        assert_eq!(extract_base_url("   "), None);
    }

    #[test]
    fn clean_dedups_normalized_values() {
        let input = "https://example.com/a\n\nhttps://example.com/b\nexample.com\r\nnot a url://x\nexample.com\n";
        assert_eq!(
            clean_targets(input),
            vec!["https://example.com:443", "example.com"]
        );
    }

    #[test]
    fn clean_file_writes_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("targets.txt");
        std::fs::write(&input, "http://a.com/x\nhttp://a.com/y\nb.com\n").unwrap();
        let outputs = vec![
            dir.path().join("targets_cleaned.txt"),
            dir.path().join("ehole").join("targets_cleaned.txt"),
        ];

        let cleaned = clean_target_file(&input, &outputs).unwrap();
        assert_eq!(cleaned, vec!["http://a.com:80", "b.com"]);
        for out in &outputs {
            assert_eq!(
                std::fs::read_to_string(out).unwrap(),
                "http://a.com:80\nb.com"
            );
        }
    }

    #[test]
    fn clean_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = clean_target_file(&dir.path().join("absent.txt"), &[]).unwrap_err();
        assert!(matches!(err, TargetError::Missing(_)));
    }
}
