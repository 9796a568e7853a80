use serde::{Deserialize, Serialize};

/// Path appended to the configured backend base URL.
pub const HYPER_GENERATE_PATH: &str = "/api/hyper-generate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Artifacts produced by one hyper-generate call.
///
/// Every field is independently optional: a missing field means the backend
/// did not produce that artifact, not that the request failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_to_video_concept: Option<String>,
}

impl GenerationResult {
    pub fn is_empty(&self) -> bool {
        self.chat_response.is_none()
            && self.image_url.is_none()
            && self.video_url.is_none()
            && self.audio_url.is_none()
            && self.image_to_video_concept.is_none()
    }
}
