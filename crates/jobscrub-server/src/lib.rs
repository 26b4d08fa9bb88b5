//! Build-server collaborator for jobscrub.
//!
//! Defines the `BuildServer` trait the scrub pipeline talks to, the wire
//! types it exchanges, a Jenkins REST implementation, and in-memory fakes
//! for testing without a real server.

pub mod diag;
pub mod error;
pub mod fakes;
pub mod jenkins;
pub mod server_traits;

// Re-export key types
pub use diag::{transport_warnings_suppressed, SuppressTransportWarnings};
pub use error::ServerError;
pub use jenkins::JenkinsClient;
pub use server_traits::{BuildInfo, BuildRef, BuildServer, JobBuildInfo, JobSummary, ServerResult};
