//! Error types for jobscrub-core

use std::path::PathBuf;

use thiserror::Error;

use jobscrub_server::ServerError;

/// Result type for scrub operations
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Errors that can abort a scrub run
#[derive(Error, Debug)]
pub enum ScrubError {
    /// An ignore or governing pattern failed to compile
    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Config file missing, unreadable, or not valid TOML
    #[error("Config file {}: {reason}", .path.display())]
    ConfigFile { path: PathBuf, reason: String },

    /// A build carried an epoch timestamp outside the representable range
    #[error("Job {name} reported an unrepresentable build timestamp ({timestamp})")]
    InvalidTimestamp { name: String, timestamp: i64 },

    /// Any fatal error from the build server
    #[error(transparent)]
    Server(#[from] ServerError),
}
