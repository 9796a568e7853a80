//! Sharing the current prompt, either through a platform share sheet or by
//! copying a text block to the clipboard.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

pub const SHARE_TITLE: &str = "AI Power";
pub const SHARE_LABEL: &str = "AI Power • Hyper-Generate";
pub const COPIED_NOTICE: &str = "Share text copied to clipboard!";
pub const COPY_FAILED_NOTICE: &str = "Copy failed. You can share the page URL!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn compose(prompt: &str, page_url: &str) -> Self {
        Self {
            title: SHARE_TITLE.to_string(),
            text: format!("{SHARE_LABEL}\nPrompt: {prompt}"),
            url: page_url.to_string(),
        }
    }

    pub fn clipboard_text(&self) -> String {
        format!("{}\n{}", self.text, self.url)
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share cancelled by user")]
    Cancelled,
    #[error("share failed: {0}")]
    Failed(String),
}

/// Platform share sheet.
#[async_trait]
pub trait NativeShare: Send + Sync {
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the platform; cancellation and failure land here too.
    Delegated,
    Copied,
    CopyFailed,
}

impl ShareOutcome {
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Delegated => None,
            Self::Copied => Some(COPIED_NOTICE),
            Self::CopyFailed => Some(COPY_FAILED_NOTICE),
        }
    }
}

#[async_trait]
pub trait ShareAction: Send + Sync {
    async fn share(&self, prompt: &str, page_url: &str) -> ShareOutcome;
}

pub struct NativeShareAction {
    platform: Arc<dyn NativeShare>,
}

impl NativeShareAction {
    pub fn new(platform: Arc<dyn NativeShare>) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl ShareAction for NativeShareAction {
    async fn share(&self, prompt: &str, page_url: &str) -> ShareOutcome {
        let payload = SharePayload::compose(prompt, page_url);
        match self.platform.share(&payload).await {
            Ok(()) => debug!("native share completed"),
            Err(ShareError::Cancelled) => debug!("native share cancelled"),
            Err(err) => debug!(error = %err, "native share failed; ignoring"),
        }
        ShareOutcome::Delegated
    }
}

pub struct ClipboardShareAction {
    clipboard: Arc<dyn ClipboardWriter>,
}

impl ClipboardShareAction {
    pub fn new(clipboard: Arc<dyn ClipboardWriter>) -> Self {
        Self { clipboard }
    }
}

#[async_trait]
impl ShareAction for ClipboardShareAction {
    async fn share(&self, prompt: &str, page_url: &str) -> ShareOutcome {
        let text = SharePayload::compose(prompt, page_url).clipboard_text();
        match self.clipboard.write_text(&text).await {
            Ok(()) => ShareOutcome::Copied,
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                ShareOutcome::CopyFailed
            }
        }
    }
}

/// Picks the native strategy when the platform offers one, else the clipboard.
pub fn select_share_action(
    native: Option<Arc<dyn NativeShare>>,
    clipboard: Arc<dyn ClipboardWriter>,
) -> Box<dyn ShareAction> {
    match native {
        Some(platform) => Box::new(NativeShareAction::new(platform)),
        None => Box::new(ClipboardShareAction::new(clipboard)),
    }
}
