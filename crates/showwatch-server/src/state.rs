use std::sync::Arc;

use showwatch_pipeline::{Pipeline, RunOutcome};
use tokio::sync::RwLock;

/// Shared handle used by the HTTP routes and the scheduler.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    last_outcome: Arc<RwLock<Option<RunOutcome>>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            last_outcome: Arc::new(RwLock::new(None)),
        }
    }

    /// Runs the pipeline once and remembers the outcome for `/health`.
    ///
    /// Runs started from the timer and from `/trigger-scrape` are not
    /// serialised against each other.
    pub async fn run_once(&self, trigger: &'static str) -> RunOutcome {
        tracing::info!(trigger, "starting pipeline run");
        let outcome = self.pipeline.run().await;
        *self.last_outcome.write().await = Some(outcome.clone());
        outcome
    }

    pub async fn last_outcome(&self) -> Option<RunOutcome> {
        self.last_outcome.read().await.clone()
    }
}
