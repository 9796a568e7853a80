//! Desktop implementations of the share and clipboard capabilities.

use std::{env, path::PathBuf, sync::Arc};

use anyhow::Context;
use arboard::Clipboard;
use async_trait::async_trait;
use client_core::{ClipboardWriter, NativeShare, ShareError, SharePayload};
use tracing::debug;
use url::form_urlencoded;

pub struct ArboardClipboard;

#[async_trait]
impl ClipboardWriter for ArboardClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let mut clipboard = Clipboard::new().context("clipboard unavailable")?;
            clipboard.set_text(text).context("clipboard write failed")?;
            Ok(())
        })
        .await
        .context("clipboard task aborted")?
    }
}

/// Hands the share text to the desktop's default mail client.
pub struct SystemShareSheet {
    opener: PathBuf,
}

impl SystemShareSheet {
    fn opener_name() -> Option<&'static str> {
        if cfg!(target_os = "macos") {
            Some("open")
        } else if cfg!(unix) {
            Some("xdg-open")
        } else {
            None
        }
    }

    pub fn probe() -> Option<Self> {
        let name = Self::opener_name()?;
        let path = env::var_os("PATH")?;
        env::split_paths(&path)
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
            .map(|opener| Self { opener })
    }
}

#[async_trait]
impl NativeShare for SystemShareSheet {
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        let status = tokio::process::Command::new(&self.opener)
            .arg(mailto_url(payload))
            .status()
            .await
            .map_err(|err| ShareError::Failed(err.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            debug!(?status, "share opener exited unsuccessfully");
            Err(ShareError::Cancelled)
        }
    }
}

pub fn mailto_url(payload: &SharePayload) -> String {
    let body = format!("{}\n{}", payload.text, payload.url);
    format!(
        "mailto:?subject={}&body={}",
        percent_encode(&payload.title),
        percent_encode(&body)
    )
}

// form encoding writes spaces as '+', which mail clients show literally.
fn percent_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Returns the native share capability only when enabled and available.
pub fn probe_native_share(enabled: bool) -> Option<Arc<dyn NativeShare>> {
    if !enabled {
        return None;
    }
    match SystemShareSheet::probe() {
        Some(sheet) => Some(Arc::new(sheet)),
        None => {
            debug!("no system share opener found; falling back to clipboard");
            None
        }
    }
}
