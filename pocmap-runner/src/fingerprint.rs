use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

use crate::error::RunnerError;

/// Runs the external fingerprinting tool (`ehole finger`) over a target
/// list, producing the table the orchestrator consumes.
#[derive(Debug, Clone)]
pub struct FingerprintRunner {
    binary: PathBuf,
    work_dir: PathBuf,
}

impl FingerprintRunner {
    /// `work_dir` is the directory the tool reads its target lists from.
    pub fn new(binary: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Location of the staged copy of `list` inside the tool's directory.
    pub fn staged_list(&self, list: &Path) -> PathBuf {
        match list.file_name() {
            Some(name) => self.work_dir.join(name),
            None => self.work_dir.join(list),
        }
    }

    pub fn build_args<'a>(&self, list: &'a Path, table: &'a Path) -> Vec<&'a OsStr> {
        vec![
            OsStr::new("finger"),
            OsStr::new("-l"),
            list.as_os_str(),
            OsStr::new("-o"),
            table.as_os_str(),
        ]
    }

    /// Fingerprint every target in `list`, writing the table to `table`.
    /// Tool output is passed through to the terminal.
    pub async fn run(&self, list: &Path, table: &Path) -> Result<(), RunnerError> {
        info!(list = %list.display(), table = %table.display(), "running fingerprint tool");
        let status = Command::new(&self.binary)
            .args(self.build_args(list, table))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| RunnerError::Spawn {
                program: self.binary.clone(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunnerError::Failed {
                program: self.binary.clone(),
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_list_uses_basename() {
        let runner = FingerprintRunner::new("ehole_windows/ehole_windows.exe", "ehole_windows");
        assert_eq!(
            runner.staged_list(Path::new("lists/targets_cleaned.txt")),
            PathBuf::from("ehole_windows/targets_cleaned.txt")
        );
    }

    #[test]
    fn args_shape() {
        let runner = FingerprintRunner::new("ehole", "ehole_windows");
        let args = runner.build_args(Path::new("in.txt"), Path::new("out.xlsx"));
        assert_eq!(args, vec!["finger", "-l", "in.txt", "-o", "out.xlsx"]);
    }

    #[tokio::test]
    async fn missing_binary_reported() {
        let runner = FingerprintRunner::new("/nonexistent/pocmap-ehole", ".");
        let err = runner
            .run(Path::new("in.txt"), Path::new("out.xlsx"))
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_tool_reports_status() {
        let runner = FingerprintRunner::new("/bin/false", ".");
        let err = runner
            .run(Path::new("in.txt"), Path::new("out.xlsx"))
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Failed { code: Some(1), .. }));
    }
}
