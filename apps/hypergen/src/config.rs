use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONFIG_PATH: &str = "hypergen.toml";
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub page_url: Option<String>,
    pub native_share: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            request_timeout_secs: 120,
            page_url: None,
            native_share: false,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// URL included in shared text; the backend URL stands in when unset.
    pub fn page_url(&self) -> &str {
        self.page_url.as_deref().unwrap_or(&self.backend_url)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    request_timeout_secs: Option<u64>,
    page_url: Option<String>,
    native_share: Option<bool>,
}

/// Defaults, then the optional TOML file, then `BACKEND_URL`.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => {
            let file_cfg = parse_file_settings(&raw)
                .with_context(|| format!("invalid config file '{}'", config_path.display()))?;
            apply_file_settings(&mut settings, file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", config_path.display()))
        }
    }

    if let Ok(v) = std::env::var(BACKEND_URL_ENV) {
        settings.backend_url = v;
    }

    settings.backend_url = normalize_backend_url(&settings.backend_url);
    Ok(settings)
}

fn parse_file_settings(raw: &str) -> anyhow::Result<FileSettings> {
    Ok(toml::from_str(raw)?)
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.backend_url {
        settings.backend_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.page_url {
        settings.page_url = Some(v);
    }
    if let Some(v) = file_cfg.native_share {
        settings.native_share = v;
    }
}

pub fn normalize_backend_url(raw_backend_url: &str) -> String {
    let trimmed = raw_backend_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_BACKEND_URL.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
