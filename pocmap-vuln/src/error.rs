use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single check source. Never fatal: the resolver logs it
/// and the source contributes nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("advisory search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advisory search returned status {0}")]
    Status(u16),
    #[error("failed to parse advisory search response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid advisory search endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("local lookup task failed: {0}")]
    Join(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(
            SourceError::Status(503).to_string(),
            "advisory search returned status 503"
        );
    }

    #[test]
    fn io_display_names_path() {
        let err = SourceError::Io {
            path: PathBuf::from("poc/cve"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("poc/cve"));
        assert!(msg.contains("missing"));
    }
}
