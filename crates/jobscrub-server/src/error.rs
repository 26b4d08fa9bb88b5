//! Error types for jobscrub-server

use thiserror::Error;

/// Errors that can occur talking to the build server
#[derive(Error, Debug)]
pub enum ServerError {
    /// Server URL could not be parsed
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Server unreachable or transport failure
    #[error("Build server unreachable: {0}")]
    Connection(String),

    /// Credentials rejected
    #[error("Build server rejected credentials: {0}")]
    Unauthorized(String),

    /// Named job does not exist on the server
    #[error("Job not found: {0}")]
    NotFound(String),

    /// Response was not what the server contract promises
    #[error("Unexpected response from build server: {0}")]
    Protocol(String),

    /// Delete call failed for a specific job
    #[error("Failed to delete job {name}: {reason}")]
    Deletion { name: String, reason: String },
}

impl From<reqwest::Error> for ServerError {
    fn from(err: reqwest::Error) -> Self {
        ServerError::Connection(err.to_string())
    }
}
