//! jobscrub core - stale-job scrubbing for build-automation servers
//!
//! Provides the single-pass scrub pipeline:
//! - Selects candidate jobs (override list, or exclusion filters)
//! - Measures each candidate's days since last build
//! - Plans and executes deletions past a staleness threshold

pub mod config;
pub mod error;
pub mod filter;
pub mod plan;
pub mod scrub;
pub mod staleness;
pub mod telemetry;

// Re-export key types
pub use config::{DeletionPolicy, FilterConfig, ScrubConfig, ScrubDefaults};
pub use error::{Result, ScrubError};
pub use filter::select_jobs;
pub use plan::plan;
pub use scrub::{DeletionFailure, PlannedJob, ScrubAction, ScrubReport, Scrubber};
pub use staleness::{evaluate, EvaluatedJob};
pub use telemetry::init_tracing;
