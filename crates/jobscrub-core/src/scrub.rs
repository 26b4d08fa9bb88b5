//! Run orchestration: filter, evaluate, plan, execute.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use jobscrub_server::{BuildServer, ServerError, SuppressTransportWarnings};

use crate::config::{DeletionPolicy, ScrubConfig};
use crate::error::Result;
use crate::filter::select_jobs;
use crate::plan::plan;
use crate::staleness::{evaluate, EvaluatedJob};

/// What happened (or would happen) to a planned job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubAction {
    /// The job was deleted from the server.
    Deleted,

    /// Dry-run: the job would have been deleted.
    WouldDelete,
}

/// One entry of the deletion plan with its outcome.
#[derive(Debug, Clone)]
pub struct PlannedJob {
    /// The evaluated job.
    pub job: EvaluatedJob,

    /// Outcome for this job.
    pub action: ScrubAction,
}

/// A delete call that failed under the continue-on-error policy.
#[derive(Debug)]
pub struct DeletionFailure {
    /// Job name.
    pub name: String,

    /// The server error for this delete.
    pub error: ServerError,
}

/// Outcome of a complete scrub run.
#[derive(Debug, Default)]
pub struct ScrubReport {
    /// Number of jobs that had a last build and were measured.
    pub evaluated: usize,

    /// The ordered deletion plan with per-job outcomes.
    pub jobs: Vec<PlannedJob>,

    /// Failures collected under `DeletionPolicy::Continue`.
    pub failures: Vec<DeletionFailure>,
}

impl ScrubReport {
    /// Number of jobs actually deleted.
    pub fn deleted_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|planned| planned.action == ScrubAction::Deleted)
            .count()
    }

    /// Whether every planned delete succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Single-pass scrub orchestrator.
///
/// Sequences filter, staleness evaluation, planning, and execution strictly
/// in that order, one job at a time, with no retries and no state carried
/// past the run.
pub struct Scrubber {
    server: Arc<dyn BuildServer>,
    config: ScrubConfig,
    today: NaiveDate,
}

impl Scrubber {
    /// Create an orchestrator for one run.
    ///
    /// `today` is fixed here for the whole run; staleness evaluation never
    /// re-reads the clock.
    pub fn new(server: Arc<dyn BuildServer>, config: ScrubConfig, today: NaiveDate) -> Self {
        Scrubber {
            server,
            config,
            today,
        }
    }

    /// Execute the run and return the report.
    ///
    /// Dry-run records `WouldDelete` for each planned job and performs no
    /// mutating call. Live mode calls delete at most once per job name.
    /// Configuration problems surface before the first server call.
    pub async fn run(&self) -> Result<ScrubReport> {
        let governing = self.config.governing_pattern()?;
        let filter = self.config.filter()?;

        let candidates = {
            let _quiet = SuppressTransportWarnings::new();
            match &governing {
                Some(pattern) => {
                    info!(pattern = %pattern, "selecting jobs by governing pattern");
                    self.server.jobs_matching(pattern).await?
                }
                None => select_jobs(self.server.as_ref(), &filter).await?,
            }
        };
        info!(candidates = candidates.len(), "job selection complete");

        let evaluated = {
            let _quiet = SuppressTransportWarnings::new();
            evaluate(self.server.as_ref(), &candidates, self.today).await?
        };
        info!(evaluated = evaluated.len(), "staleness evaluation complete");

        let evaluated_count = evaluated.len();
        let planned = plan(evaluated, self.config.max_days, self.config.sort_by_staleness);
        info!(
            planned = planned.len(),
            max_days = self.config.max_days,
            "deletion plan ready"
        );

        let mut report = ScrubReport {
            evaluated: evaluated_count,
            jobs: Vec::with_capacity(planned.len()),
            failures: Vec::new(),
        };
        let mut seen: HashSet<String> = HashSet::new();
        for job in planned {
            // Delete each name at most once, even if the listing repeated it.
            if !seen.insert(job.name.clone()) {
                continue;
            }

            if self.config.dry_run {
                info!(job = %job.name, days = job.days_since_last_build, "would delete");
                report.jobs.push(PlannedJob {
                    job,
                    action: ScrubAction::WouldDelete,
                });
                continue;
            }

            let _quiet = SuppressTransportWarnings::new();
            match self.server.delete_job(&job.name).await {
                Ok(()) => {
                    info!(job = %job.name, days = job.days_since_last_build, "deleted");
                    report.jobs.push(PlannedJob {
                        job,
                        action: ScrubAction::Deleted,
                    });
                }
                Err(err) => match self.config.deletion_policy {
                    DeletionPolicy::FailFast => return Err(err.into()),
                    DeletionPolicy::Continue => {
                        warn!(job = %job.name, error = %err, "delete failed, continuing");
                        report.failures.push(DeletionFailure {
                            name: job.name.clone(),
                            error: err,
                        });
                    }
                },
            }
        }

        Ok(report)
    }
}
