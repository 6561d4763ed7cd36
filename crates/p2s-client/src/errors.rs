//! Error types for the generation workflow
//!
//! Every operation of the client returns one of these kinds. They are kept
//! apart because callers react to them differently: a missing local file is
//! fixed by the user, a network or protocol failure may be retried, a remote
//! failure carries the service's own diagnosis, and a timeout means the job
//! may still be running server-side.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Timed out after {:.1} seconds ({attempts} status checks)", .elapsed.as_secs_f64())]
    Timeout { elapsed: Duration, attempts: u32 },
    #[error("Generation failed: {0}")]
    RemoteFailure(String),
}

impl ClientError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::Input(_) | ClientError::Config(_) => 1,
            ClientError::Network(_) | ClientError::Protocol(_) => 2,
            ClientError::RemoteFailure(_) => 3,
            ClientError::Timeout { .. } => 4,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Protocol(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            ClientError::Protocol(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Config(format!("invalid service URL: {}", err))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
