use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;

use crate::error::RunnerError;

/// Wait for `child`, killing it if `limit` elapses first.
pub(crate) async fn wait_with_timeout(
    child: &mut Child,
    limit: Option<Duration>,
) -> Result<ExitStatus, RunnerError> {
    let Some(limit) = limit else {
        return Ok(child.wait().await?);
    };

    let waited = tokio::time::timeout(limit, child.wait()).await;
    match waited {
        Ok(status) => Ok(status?),
        Err(_) => {
            let _ = child.kill().await;
            Err(RunnerError::Timeout(limit))
        }
    }
}
