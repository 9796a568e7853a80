use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Network,
    Timeout,
    Protocol,
    Decode,
}

/// User-facing summary of a failed generation request.
///
/// `message` is what the error banner shows; `code` lets callers branch
/// without parsing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub code: ErrorCode,
    pub message: String,
}

impl FailureReason {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
