// Standard library
use std::time::Duration;

// 3rd party crates
use hickory_proto::error::ProtoError;
use thiserror::Error;

/// Reasons a probe classifies a target as unavailable.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid record name '{record}': {error}")]
    InvalidName { record: String, error: ProtoError },

    #[error("DNS message error: {0}")]
    Proto(#[from] ProtoError),

    #[error("Could not resolve address '{0}'")]
    NoAddress(String),

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{stage} timed out after {timeout:?}")]
    Timeout {
        stage: &'static str,
        timeout: Duration,
    },

    #[error("Response id {got} does not match query id {expected}")]
    IdMismatch { expected: u16, got: u16 },

    #[error("Received a message that is not a response")]
    NotAResponse,
}
