//! In-memory fake for the build-server trait (testing only)
//!
//! Provides `MemoryBuildServer`, which satisfies the `BuildServer` contract
//! without any network access. Jobs are seeded through builder methods;
//! deletions are recorded so tests can assert exactly which mutating calls
//! were made.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ServerError;
use crate::server_traits::*;

#[derive(Debug, Clone)]
struct FakeJob {
    name: String,
    last_build: Option<BuildInfo>,
}

#[derive(Debug, Default)]
struct Inner {
    jobs: Vec<FakeJob>,
    deleted: Vec<String>,
    failing_deletes: HashSet<String>,
    offline: bool,
}

/// In-memory build server backed by a `Mutex<Vec<FakeJob>>`.
///
/// Jobs are listed in seeding order.
#[derive(Debug, Default)]
pub struct MemoryBuildServer {
    inner: Mutex<Inner>,
}

impl MemoryBuildServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a job whose last build is `number` at `timestamp` (epoch millis).
    pub fn with_job(self, name: &str, number: i64, timestamp: i64) -> Self {
        self.inner.lock().unwrap().jobs.push(FakeJob {
            name: name.to_string(),
            last_build: Some(BuildInfo { number, timestamp }),
        });
        self
    }

    /// Seed a job that has never been built.
    pub fn with_unbuilt_job(self, name: &str) -> Self {
        self.inner.lock().unwrap().jobs.push(FakeJob {
            name: name.to_string(),
            last_build: None,
        });
        self
    }

    /// Make `delete_job` fail for this name.
    pub fn with_failing_delete(self, name: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .failing_deletes
            .insert(name.to_string());
        self
    }

    /// Make every operation fail with a connection error.
    pub fn offline(self) -> Self {
        self.inner.lock().unwrap().offline = true;
        self
    }

    /// Names deleted so far, in deletion order.
    pub fn deleted_jobs(&self) -> Vec<String> {
        self.inner.lock().unwrap().deleted.clone()
    }

    fn check_online(inner: &Inner) -> ServerResult<()> {
        if inner.offline {
            return Err(ServerError::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BuildServer for MemoryBuildServer {
    async fn list_jobs(&self) -> ServerResult<Vec<JobSummary>> {
        let inner = self.inner.lock().unwrap();
        Self::check_online(&inner)?;
        Ok(inner
            .jobs
            .iter()
            .map(|job| JobSummary {
                name: job.name.clone(),
            })
            .collect())
    }

    async fn get_job_info(&self, name: &str) -> ServerResult<JobBuildInfo> {
        let inner = self.inner.lock().unwrap();
        Self::check_online(&inner)?;
        let job = inner
            .jobs
            .iter()
            .find(|job| job.name == name)
            .ok_or_else(|| ServerError::NotFound(name.to_string()))?;
        Ok(JobBuildInfo {
            name: job.name.clone(),
            last_build: job.last_build.map(|build| BuildRef {
                number: build.number,
            }),
        })
    }

    async fn get_build_info(&self, name: &str, number: i64) -> ServerResult<BuildInfo> {
        let inner = self.inner.lock().unwrap();
        Self::check_online(&inner)?;
        let job = inner
            .jobs
            .iter()
            .find(|job| job.name == name)
            .ok_or_else(|| ServerError::NotFound(name.to_string()))?;
        match job.last_build {
            Some(build) if build.number == number => Ok(build),
            _ => Err(ServerError::NotFound(format!("{name} #{number}"))),
        }
    }

    async fn delete_job(&self, name: &str) -> ServerResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_online(&inner)?;
        if inner.failing_deletes.contains(name) {
            return Err(ServerError::Deletion {
                name: name.to_string(),
                reason: "server refused the delete".to_string(),
            });
        }
        let position = inner
            .jobs
            .iter()
            .position(|job| job.name == name)
            .ok_or_else(|| ServerError::NotFound(name.to_string()))?;
        inner.jobs.remove(position);
        inner.deleted.push(name.to_string());
        Ok(())
    }
}
