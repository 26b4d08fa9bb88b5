//! Staleness evaluation: days since each candidate's last build.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use jobscrub_server::{BuildServer, JobSummary};

use crate::error::{Result, ScrubError};

/// A job with a recorded last build, measured against the run's fixed date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedJob {
    /// Job name.
    pub name: String,

    /// Number of the most recent build.
    pub last_build_number: i64,

    /// Calendar date of the most recent build, time-of-day truncated.
    pub last_build_date: NaiveDate,

    /// Whole days between `last_build_date` and the run's `today`.
    pub days_since_last_build: u64,
}

/// Measure staleness for each candidate, in input order.
///
/// Jobs that have never been built produce no entry; that is the expected
/// state for a freshly created job, not an error. `today` is fixed once per
/// run so every comparison uses the same reference date even if the clock
/// rolls over mid-run.
pub async fn evaluate(
    server: &dyn BuildServer,
    candidates: &[JobSummary],
    today: NaiveDate,
) -> Result<Vec<EvaluatedJob>> {
    let mut evaluated = Vec::with_capacity(candidates.len());
    for job in candidates {
        let info = server.get_job_info(&job.name).await?;
        let Some(last) = info.last_build else {
            debug!(job = %job.name, "never built, skipping");
            continue;
        };

        let build = server.get_build_info(&job.name, last.number).await?;
        let last_build_date =
            build_date(build.timestamp).ok_or_else(|| ScrubError::InvalidTimestamp {
                name: job.name.clone(),
                timestamp: build.timestamp,
            })?;

        // Absolute difference: a build stamped in the future (clock skew)
        // still yields a non-negative staleness, never an error.
        let days_since_last_build = (today - last_build_date).num_days().unsigned_abs();

        evaluated.push(EvaluatedJob {
            name: info.name,
            last_build_number: last.number,
            last_build_date,
            days_since_last_build,
        });
    }
    Ok(evaluated)
}

/// Calendar date of an epoch-millisecond timestamp (UTC, time dropped).
fn build_date(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|datetime| datetime.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscrub_server::fakes::MemoryBuildServer;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn millis(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> i64 {
        date(y, m, d)
            .and_hms_opt(hh, mm, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    #[test]
    fn test_build_date_truncates_time_of_day() {
        // Two minutes apart across midnight land on different days.
        assert_eq!(
            build_date(millis(2026, 8, 4, 23, 59)),
            Some(date(2026, 8, 4))
        );
        assert_eq!(
            build_date(millis(2026, 8, 5, 0, 1)),
            Some(date(2026, 8, 5))
        );
    }

    #[test]
    fn test_build_date_rejects_out_of_range() {
        assert!(build_date(i64::MAX).is_none());
    }

    #[tokio::test]
    async fn test_evaluate_measures_whole_days() {
        let server = MemoryBuildServer::new().with_job("j1", 4, millis(2026, 6, 21, 9, 30));
        let candidates = server.list_jobs().await.unwrap();

        let evaluated = evaluate(&server, &candidates, date(2026, 8, 5))
            .await
            .unwrap();

        assert_eq!(evaluated.len(), 1);
        assert_eq!(evaluated[0].name, "j1");
        assert_eq!(evaluated[0].last_build_number, 4);
        assert_eq!(evaluated[0].last_build_date, date(2026, 6, 21));
        assert_eq!(evaluated[0].days_since_last_build, 45);
    }

    #[tokio::test]
    async fn test_evaluate_skips_never_built() {
        let server = MemoryBuildServer::new()
            .with_job("built", 1, millis(2026, 8, 1, 12, 0))
            .with_unbuilt_job("fresh");
        let candidates = server.list_jobs().await.unwrap();

        let evaluated = evaluate(&server, &candidates, date(2026, 8, 5))
            .await
            .unwrap();

        let names: Vec<&str> = evaluated.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names, vec!["built"]);
    }

    #[tokio::test]
    async fn test_evaluate_future_build_uses_absolute_days() {
        let server = MemoryBuildServer::new().with_job("skewed", 2, millis(2026, 8, 8, 0, 30));
        let candidates = server.list_jobs().await.unwrap();

        let evaluated = evaluate(&server, &candidates, date(2026, 8, 5))
            .await
            .unwrap();

        assert_eq!(evaluated[0].days_since_last_build, 3);
    }

    #[tokio::test]
    async fn test_evaluate_preserves_input_order() {
        let server = MemoryBuildServer::new()
            .with_job("c", 1, millis(2026, 8, 1, 0, 0))
            .with_job("a", 2, millis(2026, 7, 1, 0, 0))
            .with_job("b", 3, millis(2026, 6, 1, 0, 0));
        let candidates = server.list_jobs().await.unwrap();

        let evaluated = evaluate(&server, &candidates, date(2026, 8, 5))
            .await
            .unwrap();

        let names: Vec<&str> = evaluated.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_evaluate_invalid_timestamp_is_fatal() {
        let server = MemoryBuildServer::new().with_job("broken", 1, i64::MAX);
        let candidates = server.list_jobs().await.unwrap();

        let err = evaluate(&server, &candidates, date(2026, 8, 5))
            .await
            .unwrap_err();

        assert!(matches!(err, ScrubError::InvalidTimestamp { .. }));
    }
}
