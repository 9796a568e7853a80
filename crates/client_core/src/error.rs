use std::time::Duration;

use shared::error::{ErrorCode, FailureReason};
use thiserror::Error;

/// Banner text for failures whose details are not meant for the user.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("network failure talking to generation backend: {0}")]
    Network(#[source] reqwest::Error),
    #[error("generation request timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("generation backend returned status {status}")]
    Status { status: u16 },
    #[error("generation response body could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
}

impl GenerationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) => ErrorCode::Network,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Status { .. } => ErrorCode::Protocol,
            Self::Decode(_) => ErrorCode::Decode,
        }
    }

    /// Collapses the error into the single banner message shown to the user.
    pub fn reason(&self) -> FailureReason {
        let message = match self {
            Self::Network(_) => "Network error: could not reach the generation backend".to_string(),
            Self::Timeout { after } => format!("Request timed out after {}s", after.as_secs()),
            Self::Status { status } => format!("Request failed: {status}"),
            Self::Decode(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        };
        FailureReason::new(self.code(), message)
    }
}
