use crate::gateway::BackendGateway;

/// Models advertised when the backend catalog cannot be fetched
pub const FALLBACK_MODELS: [&str; 2] = ["rembg", "bria"];

/// Model catalog, tagged with how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Catalog {
    /// List returned by the backend
    Loaded(Vec<String>),
    /// Built-in list used because the backend could not be asked
    Fallback(Vec<String>),
}

impl Catalog {
    /// Fetch the catalog, once per run.
    ///
    /// Any failure (transport, missing field, malformed body) falls back to
    /// the built-in list. The failure is logged, never surfaced to the user.
    pub async fn load(gateway: &dyn BackendGateway) -> Self {
        match gateway.fetch_models().await {
            Ok(models) => {
                tracing::info!("Backend advertises {} models", models.len());
                Catalog::Loaded(models)
            }
            Err(e) => {
                tracing::debug!("Catalog fetch failed ({}), using fallback list", e);
                Catalog::Fallback(FALLBACK_MODELS.iter().map(|m| m.to_string()).collect())
            }
        }
    }

    pub fn models(&self) -> &[String] {
        match self {
            Catalog::Loaded(models) | Catalog::Fallback(models) => models,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Catalog::Fallback(_))
    }
}
