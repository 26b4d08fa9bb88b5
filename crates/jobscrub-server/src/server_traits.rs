//! Build-server trait definition for jobscrub
//!
//! `BuildServer` is the seam between the scrub pipeline and the remote
//! job-management server. The pipeline consumes exactly these operations:
//! list jobs, look up one job, look up one build, delete a job, and an
//! optional pattern-based bulk lookup.
//!
//! The trait is async and backend-agnostic. An in-memory fake is provided
//! for testing via the `fakes` module; the production implementation is
//! [`crate::jenkins::JenkinsClient`].

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;

/// Result type for build-server operations
pub type ServerResult<T> = std::result::Result<T, ServerError>;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One entry from the server's job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Job name, unique on the server.
    pub name: String,
}

/// Pointer to a job's most recent build, if it has ever been built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRef {
    /// Incrementing build number.
    pub number: i64,
}

/// Per-job metadata returned by the single-job lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBuildInfo {
    /// Job name.
    pub name: String,

    /// Most recent build, or `None` for a job that has never been built.
    /// A missing last build is an expected state, not an error.
    pub last_build: Option<BuildRef>,
}

/// Metadata for one specific build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Build number.
    pub number: i64,

    /// Build start time as epoch milliseconds.
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// BuildServer — remote job management
// ---------------------------------------------------------------------------

/// Remote build-automation server.
///
/// Guarantees:
/// - `list_jobs` returns every job in the server's listing order.
/// - `get_job_info` fails with `ServerError::NotFound` for unknown names.
/// - `delete_job` is a mutating call; callers decide when it may run.
/// - No operation retries internally; every call is one round-trip.
#[async_trait]
pub trait BuildServer: Send + Sync {
    /// List all jobs on the server.
    async fn list_jobs(&self) -> ServerResult<Vec<JobSummary>>;

    /// Look up one job by exact name.
    async fn get_job_info(&self, name: &str) -> ServerResult<JobBuildInfo>;

    /// Look up one build of a job by build number.
    async fn get_build_info(&self, name: &str, number: i64) -> ServerResult<BuildInfo>;

    /// Delete a job by exact name.
    async fn delete_job(&self, name: &str) -> ServerResult<()>;

    /// List jobs whose name matches `pattern` (unanchored search).
    ///
    /// The Jenkins REST API has no server-side pattern listing, so the
    /// default implementation filters the full listing client-side, the
    /// same way the stock Jenkins clients do.
    async fn jobs_matching(&self, pattern: &Regex) -> ServerResult<Vec<JobSummary>> {
        let jobs = self.list_jobs().await?;
        Ok(jobs
            .into_iter()
            .filter(|job| pattern.is_match(&job.name))
            .collect())
    }
}
