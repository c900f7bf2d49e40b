use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pocmap_runner::CheckRunner;
use pocmap_types::{Fingerprint, GroupKind, ScanTask, TargetGroups};
use pocmap_vuln::ResolveChecks;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// What one wave of scanning did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveSummary {
    pub kind: GroupKind,
    /// Fingerprints that resolved to at least one check.
    pub fingerprints: usize,
    /// Fingerprints with no scannable checks.
    pub skipped: Vec<Fingerprint>,
    pub tasks_scheduled: usize,
    /// Tasks whose process could not be run to completion.
    pub tasks_failed: usize,
    /// Artifact locations of every task that ran.
    pub artifacts: Vec<PathBuf>,
}

impl WaveSummary {
    fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            fingerprints: 0,
            skipped: Vec::new(),
            tasks_scheduled: 0,
            tasks_failed: 0,
            artifacts: Vec::new(),
        }
    }

    fn record(&mut self, outcome: TaskOutcome) {
        if !outcome.completed {
            self.tasks_failed += 1;
        }
        if let Some(artifact) = outcome.artifact {
            self.artifacts.push(artifact);
        }
    }
}

struct TaskOutcome {
    artifact: Option<PathBuf>,
    completed: bool,
}

/// Fans each fingerprint's (URL, check) pairs out to the runner.
///
/// One limiter is shared by every wave this dispatcher runs, so at most
/// `capacity` checks execute at any instant regardless of how many
/// fingerprints or waves are queued.
pub struct Dispatcher {
    resolver: Arc<dyn ResolveChecks>,
    runner: Arc<dyn CheckRunner>,
    limiter: Arc<Semaphore>,
    capacity: usize,
    next_seq: AtomicU64,
}

impl Dispatcher {
    pub fn new(
        resolver: Arc<dyn ResolveChecks>,
        runner: Arc<dyn CheckRunner>,
        capacity: usize,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            resolver,
            runner,
            limiter: Arc::new(Semaphore::new(capacity)),
            capacity,
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resolve and scan every fingerprint in `groups`. Returns once every
    /// scheduled task has finished.
    pub async fn dispatch(&self, groups: &TargetGroups) -> WaveSummary {
        let kind = groups.kind;
        info!(
            group = %kind,
            fingerprints = groups.len(),
            targets = groups.target_count(),
            "wave starting"
        );

        let mut summary = WaveSummary::new(kind);
        let mut join_set: JoinSet<TaskOutcome> = JoinSet::new();

        for (fingerprint, urls) in groups.iter() {
            let resolution = self.resolver.resolve(fingerprint).await;
            if resolution.is_empty() {
                info!(group = %kind, %fingerprint, "no checks found, skipping");
                summary.skipped.push(fingerprint.clone());
                continue;
            }

            let mut seen = HashSet::new();
            let targets: Vec<&String> = urls.iter().filter(|u| seen.insert(u.as_str())).collect();
            info!(
                group = %kind,
                %fingerprint,
                targets = targets.len(),
                checks = resolution.len(),
                "scheduling checks"
            );
            summary.fingerprints += 1;

            for url in targets {
                for check in resolution.checks() {
                    let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                    let task = ScanTask::new(url.clone(), check.clone(), seq);
                    join_set.spawn(run_task(
                        task,
                        Arc::clone(&self.runner),
                        Arc::clone(&self.limiter),
                    ));
                    summary.tasks_scheduled += 1;
                }
            }
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    warn!(group = %kind, error = %e, "scan task panicked");
                    summary.tasks_failed += 1;
                }
            }
        }

        info!(
            group = %kind,
            tasks = summary.tasks_scheduled,
            failed = summary.tasks_failed,
            skipped = summary.skipped.len(),
            "wave complete"
        );
        summary
    }
}

/// Wait for a slot, then run one check. The slot is released when the
/// permit drops, whatever the outcome.
async fn run_task(
    task: ScanTask,
    runner: Arc<dyn CheckRunner>,
    limiter: Arc<Semaphore>,
) -> TaskOutcome {
    let _permit = match limiter.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            warn!(url = %task.target, check = %task.check, error = %e, "limiter closed");
            return TaskOutcome {
                artifact: None,
                completed: false,
            };
        }
    };

    let artifact = runner.artifact_path(&task);
    debug!(url = %task.target, check = %task.check, "running check");
    let completed = match runner.run(&task, &artifact).await {
        Ok(_) => true,
        Err(e) => {
            debug!(url = %task.target, check = %task.check, error = %e, "check did not run");
            false
        }
    };

    TaskOutcome {
        artifact: Some(artifact),
        completed,
    }
}
