use pocmap_types::{Finding, TargetGroups};
use tracing::{debug, info, warn};

use crate::aggregate::{AggregateError, Report};
use crate::dispatch::{Dispatcher, WaveSummary};

/// Result of a complete orchestration run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub waves: Vec<WaveSummary>,
    pub findings: Vec<Finding>,
}

impl RunReport {
    pub fn tasks_scheduled(&self) -> usize {
        self.waves.iter().map(|w| w.tasks_scheduled).sum()
    }
}

/// Runs groupings as sequential waves and aggregates their findings.
pub struct ScanEngine {
    dispatcher: Dispatcher,
}

impl ScanEngine {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Dispatch each grouping in order, starting a wave only after the
    /// previous one has fully joined, then ingest every artifact the run
    /// produced.
    pub async fn run(&self, waves: &[TargetGroups]) -> RunReport {
        let mut summaries = Vec::with_capacity(waves.len());
        for groups in waves {
            summaries.push(self.dispatcher.dispatch(groups).await);
        }

        let report = Report::new();
        for artifact in summaries.iter().flat_map(|w| &w.artifacts) {
            match report.ingest(artifact) {
                Ok(count) => debug!(artifact = %artifact.display(), count, "ingested artifact"),
                Err(AggregateError::Missing(_)) => {
                    debug!(artifact = %artifact.display(), "no artifact, no findings")
                }
                Err(e) => warn!(error = %e, "skipping unreadable artifact"),
            }
        }

        let findings = report.into_findings();
        info!(
            tasks = summaries.iter().map(|w| w.tasks_scheduled).sum::<usize>(),
            findings = findings.len(),
            "run complete"
        );
        RunReport {
            waves: summaries,
            findings,
        }
    }
}
