use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pocmap_types::ScanTask;
use tokio::process::Command;
use tracing::debug;

use crate::artifact::{artifact_name, now_millis};
use crate::error::RunnerError;
use crate::process::wait_with_timeout;

/// Default flag asking the scan engine for line-delimited JSON output.
pub const DEFAULT_JSON_FLAG: &str = "-json";

/// How a finished scan-check process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    pub elapsed: Duration,
}

/// Executes one check against one target.
#[async_trait]
pub trait CheckRunner: Send + Sync {
    /// Where the findings of `task` will be written.
    fn artifact_path(&self, task: &ScanTask) -> PathBuf;

    /// Run `task` to completion, writing findings to `artifact`.
    async fn run(&self, task: &ScanTask, artifact: &Path) -> Result<RunStatus, RunnerError>;
}

/// Runs the nuclei binary once per task.
#[derive(Debug, Clone)]
pub struct NucleiRunner {
    binary: PathBuf,
    results_dir: PathBuf,
    json_flag: String,
    timeout: Option<Duration>,
}

impl NucleiRunner {
    pub fn new(binary: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            results_dir: results_dir.into(),
            json_flag: DEFAULT_JSON_FLAG.to_string(),
            timeout: None,
        }
    }

    pub fn with_json_flag(mut self, flag: impl Into<String>) -> Self {
        self.json_flag = flag.into();
        self
    }

    /// Kill a task's process once `timeout` elapses. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Command-line arguments for one task.
    pub fn build_args(&self, task: &ScanTask, artifact: &Path) -> Vec<OsString> {
        vec![
            "-u".into(),
            task.target.clone().into(),
            "-t".into(),
            task.check.path().as_os_str().to_owned(),
            self.json_flag.clone().into(),
            "-o".into(),
            artifact.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl CheckRunner for NucleiRunner {
    fn artifact_path(&self, task: &ScanTask) -> PathBuf {
        self.results_dir.join(artifact_name(task, now_millis()))
    }

    async fn run(&self, task: &ScanTask, artifact: &Path) -> Result<RunStatus, RunnerError> {
        let start = Instant::now();
        let mut child = Command::new(&self.binary)
            .args(self.build_args(task, artifact))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunnerError::Spawn {
                program: self.binary.clone(),
                source: e,
            })?;

        let status = wait_with_timeout(&mut child, self.timeout).await?;
        let elapsed = start.elapsed();
        debug!(
            url = %task.target,
            check = %task.check,
            code = ?status.code(),
            elapsed_ms = elapsed.as_millis() as u64,
            "scan check finished"
        );

        Ok(RunStatus {
            code: status.code(),
            elapsed,
        })
    }
}
