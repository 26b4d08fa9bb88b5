//! Job selection: override lists and exclusion filters.

use tracing::debug;

use jobscrub_server::{BuildServer, JobSummary, ServerError};

use crate::config::FilterConfig;
use crate::error::Result;

/// Select the jobs that proceed to staleness evaluation.
///
/// Two mutually exclusive modes:
/// 1. Override — every name in `only_jobs` is resolved individually; names
///    missing on the server are skipped without error. A non-empty resolved
///    set is returned as-is and no exclusion filter applies.
/// 2. Exclusion — used only when override resolution yields nothing: the
///    full listing is fetched and jobs matching an ignore pattern or an
///    exact ignore name are kept on the server; the rest are candidates,
///    in listing order.
pub async fn select_jobs(
    server: &dyn BuildServer,
    filter: &FilterConfig,
) -> Result<Vec<JobSummary>> {
    let mut matched = Vec::new();
    for name in &filter.only_jobs {
        match server.get_job_info(name).await {
            Ok(info) => matched.push(JobSummary { name: info.name }),
            Err(ServerError::NotFound(_)) => {
                debug!(job = %name, "override job not on server, skipping");
            }
            Err(err) => return Err(err.into()),
        }
    }
    if !matched.is_empty() {
        return Ok(matched);
    }

    let all = server.list_jobs().await?;
    Ok(all
        .into_iter()
        .filter(|job| !filter.is_ignored(&job.name))
        .collect())
}
