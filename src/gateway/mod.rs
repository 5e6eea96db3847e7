mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::workflow::InputImage;

/// Errors surfaced at the backend gateway seam
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend answered a model's request with a non-success status
    #[error("Background removal failed for {model} (HTTP {status})")]
    ModelRequest { model: String, status: u16 },

    /// The request never completed (connect failure, broken transfer, ...)
    #[error("Background removal failed for {model}: {source}")]
    Transport {
        model: String,
        #[source]
        source: reqwest::Error,
    },

    /// The model catalog could not be fetched or parsed
    #[error("Model catalog unavailable: {0}")]
    Catalog(String),
}

/// Trait for the background-removal backend
///
/// The backend is an opaque collaborator: it advertises model identifiers
/// and turns (image, model) pairs into processed images. Keeping it behind
/// a trait lets tests script per-model replies without a network.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Fetch the list of model identifiers the backend supports
    async fn fetch_models(&self) -> Result<Vec<String>, GatewayError>;

    /// Submit one image to one model and return the processed image bytes
    async fn remove_background(
        &self,
        image: &InputImage,
        model: &str,
    ) -> Result<Vec<u8>, GatewayError>;
}

/// Create the default gateway (HTTP) for a base URL
pub fn create_default_gateway(base_url: &str) -> Arc<dyn BackendGateway> {
    Arc::new(HttpGateway::new(base_url))
}
