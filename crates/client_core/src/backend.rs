use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{GenerationRequest, GenerationResult, HYPER_GENERATE_PATH};
use tracing::debug;
use url::Url;

use crate::error::GenerationError;

/// The external generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn hyper_generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationResult, GenerationError>;
}

pub struct HttpGenerationBackend {
    http: Client,
    endpoint: Url,
}

impl HttpGenerationBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            endpoint: hyper_generate_endpoint(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Joins by concatenation so a base URL with a path prefix keeps it.
pub fn hyper_generate_endpoint(base_url: &str) -> Result<Url> {
    let base = base_url.trim().trim_end_matches('/');
    let raw = format!("{base}{HYPER_GENERATE_PATH}");
    let endpoint =
        Url::parse(&raw).with_context(|| format!("invalid generation backend url '{base_url}'"))?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        anyhow::bail!(
            "generation backend url '{base_url}' must use http or https, got '{}'",
            endpoint.scheme()
        );
    }
    Ok(endpoint)
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn hyper_generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationResult, GenerationError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(GenerationError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(GenerationError::Network)?;
        debug!(status = status.as_u16(), bytes = body.len(), "hyper-generate response received");
        serde_json::from_slice(&body).map_err(GenerationError::Decode)
    }
}
