use shared::{error::FailureReason, protocol::GenerationResult};

/// Latest successful result and latest error, as read by the display layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultStore {
    last_result: Option<GenerationResult>,
    last_error: Option<FailureReason>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored result wholesale; fields are never merged.
    pub fn set_result(&mut self, result: GenerationResult) {
        self.last_result = Some(result);
    }

    pub fn set_error(&mut self, reason: FailureReason) {
        self.last_error = Some(reason);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn last_result(&self) -> Option<&GenerationResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&FailureReason> {
        self.last_error.as_ref()
    }
}
