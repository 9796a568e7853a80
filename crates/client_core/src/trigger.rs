use shared::domain::RequestSeq;
use tracing::info;

use crate::controller::RequestController;

pub const DEFAULT_PROMPT: &str =
    "A serene cyberpunk city at sunset, with flying cars and holographic advertisements.";

/// Fires the startup generation exactly once; everything after that is user-driven.
#[derive(Debug, Clone)]
pub struct LifecycleTrigger {
    default_prompt: String,
    fired: bool,
}

impl Default for LifecycleTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleTrigger {
    pub fn new() -> Self {
        Self::with_default_prompt(DEFAULT_PROMPT)
    }

    pub fn with_default_prompt(default_prompt: impl Into<String>) -> Self {
        Self {
            default_prompt: default_prompt.into(),
            fired: false,
        }
    }

    pub fn default_prompt(&self) -> &str {
        &self.default_prompt
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn on_start(&mut self, controller: &mut RequestController) -> Option<RequestSeq> {
        if self.fired {
            return None;
        }
        self.fired = true;
        info!("running startup generation with default prompt");
        Some(controller.generate(self.default_prompt.clone()))
    }
}
