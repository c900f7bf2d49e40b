use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Errors raised at the external process boundary.
#[derive(Debug)]
pub enum RunnerError {
    /// The external program could not be started.
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    /// Waiting on or talking to the child process failed.
    Io(std::io::Error),
    /// The child exceeded its time limit and was killed.
    Timeout(Duration),
    /// The child exited unsuccessfully.
    Failed { program: PathBuf, code: Option<i32> },
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, source } => {
                write!(f, "failed to start {}: {source}", program.display())
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Timeout(limit) => write!(f, "process timed out after {}s", limit.as_secs()),
            Self::Failed {
                program,
                code: Some(code),
            } => write!(f, "{} exited with status {code}", program.display()),
            Self::Failed {
                program,
                code: None,
            } => write!(f, "{} terminated by signal", program.display()),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RunnerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
