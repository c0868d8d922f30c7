//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kantan_core::{Store, TriagePipeline};
use kantan_llm::{CompletionClient, CompletionSettings, OpenAiCompatibleClient};

use crate::config::Config;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: TriagePipeline,
    /// `None` when narrative enrichment is disabled
    pub completion: Option<Arc<dyn CompletionClient>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the store and build the completion client from configuration.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = Store::open(&config.database.path).with_context(|| {
            format!(
                "Failed to open directory database at {}",
                config.database.path.display()
            )
        })?;

        let completion: Option<Arc<dyn CompletionClient>> = if config.llm.enabled {
            let client = OpenAiCompatibleClient::new(CompletionSettings {
                base_url: config.llm.base_url.clone(),
                api_key: config.llm.api_key.clone(),
                model: config.llm.model.clone(),
                max_tokens: config.llm.max_tokens,
                timeout: Duration::from_secs(config.llm.timeout_secs),
            })
            .context("Failed to build completion client")?;
            Some(Arc::new(client))
        } else {
            None
        };

        Ok(Self::new(store, completion, config))
    }

    /// Assemble state from parts. Tests use this with an in-memory store.
    pub fn new(
        store: Store,
        completion: Option<Arc<dyn CompletionClient>>,
        config: Config,
    ) -> Self {
        let matcher = config
            .matching
            .algorithm
            .build(config.matching.fuzzy_threshold);

        Self {
            pipeline: TriagePipeline::new(store, Arc::from(matcher)),
            completion,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &Store {
        self.pipeline.store()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pipeline", &self.pipeline)
            .field("completion", &self.completion.as_ref().map(|c| c.model().to_string()))
            .finish_non_exhaustive()
    }
}
