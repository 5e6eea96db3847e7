use super::{BackendGateway, GatewayError};
use crate::workflow::InputImage;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Address used when neither the CLI nor the environment names a backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment override for the backend base URL
pub const BACKEND_URL_ENV: &str = "BGRM_BACKEND_URL";

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Option<Vec<String>>,
}

/// HTTP implementation of the backend gateway
///
/// The client carries no timeout: a slow model runs to completion or to a
/// transport failure, never to a client-side deadline.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the base URL: explicit override, then environment, then default
    pub fn resolve_base_url(cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override {
            return url.to_string();
        }
        std::env::var(BACKEND_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn fetch_models(&self) -> Result<Vec<String>, GatewayError> {
        let url = self.endpoint("/models");
        tracing::debug!("Fetching model catalog from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Catalog(e.to_string()))?;

        let body: ModelsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Catalog(e.to_string()))?;

        body.models
            .ok_or_else(|| GatewayError::Catalog("response has no models field".to_string()))
    }

    async fn remove_background(
        &self,
        image: &InputImage,
        model: &str,
    ) -> Result<Vec<u8>, GatewayError> {
        let url = self.endpoint("/remove-background");
        tracing::debug!(
            "Submitting {} ({} bytes) to {} for model {}",
            image.file_name,
            image.bytes.len(),
            url,
            model
        );

        let form = Form::new()
            .part(
                "file",
                Part::bytes(image.bytes.clone()).file_name(image.file_name.clone()),
            )
            .text("model", model.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                model: model.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::ModelRequest {
                model: model.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| GatewayError::Transport {
            model: model.to_string(),
            source: e,
        })?;

        Ok(bytes.to_vec())
    }
}
