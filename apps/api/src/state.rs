use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::screening::scoring::{ResumeScorer, TfIdfSkillScorer};
use crate::screening::similarity::TfIdfSimilarity;
use crate::screening::store::ScreeningStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable scorer. Default: TfIdfSkillScorer.
    pub scorer: Arc<dyn ResumeScorer>,
    /// Job and candidates. One lock serializes set-job, upload and screen.
    pub store: Arc<Mutex<ScreeningStore>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let scorer = TfIdfSkillScorer::new(TfIdfSimilarity::new(config.tfidf_max_features));
        Self {
            config,
            scorer: Arc::new(scorer),
            store: Arc::new(Mutex::new(ScreeningStore::new())),
        }
    }
}
