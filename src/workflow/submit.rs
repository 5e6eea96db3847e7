use super::{InputImage, SelectionSet};
use crate::gateway::{BackendGateway, GatewayError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// One settled per-model request
#[derive(Debug)]
pub struct ModelOutcome {
    /// Submission this result belongs to
    pub generation: u64,
    pub model: String,
    pub result: Result<Vec<u8>, GatewayError>,
}

/// Fans one submission out to every selected model
pub struct Orchestrator {
    gateway: Arc<dyn BackendGateway>,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }

    /// Issue one independent request per selected model.
    ///
    /// Outcomes are delivered over the returned channel as each request
    /// settles, in whatever order the backend produces them; the channel
    /// closes once every request has settled. One model's failure does not
    /// delay or discard delivery for the others.
    ///
    /// An empty selection issues no requests and the channel closes
    /// immediately.
    pub fn submit(
        &self,
        generation: u64,
        image: Arc<InputImage>,
        selection: &SelectionSet,
    ) -> mpsc::Receiver<ModelOutcome> {
        let models = selection.models();
        let (tx, rx) = mpsc::channel(models.len().max(1));

        let mut tasks: JoinSet<ModelOutcome> = JoinSet::new();
        for model in models {
            let gateway = Arc::clone(&self.gateway);
            let image = Arc::clone(&image);
            tasks.spawn(async move {
                let result = gateway.remove_background(&image, &model).await;
                ModelOutcome {
                    generation,
                    model,
                    result,
                }
            });
        }

        tokio::spawn(async move {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(outcome) => {
                        if tx.send(outcome).await.is_err() {
                            // Receiver is gone, nobody is listening anymore
                            break;
                        }
                    }
                    Err(e) => tracing::error!("Model request task failed to join: {}", e),
                }
            }
        });

        rx
    }
}
