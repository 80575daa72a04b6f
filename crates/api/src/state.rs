use crate::config::AppConfig;
use crate::guidance::{HttpModelClient, ModelClient};
use crate::sources::{CenterSource, CycleSource};
use orienta_dataset::{Fetcher, HttpFetcher};
use orienta_index::{CenterIndex, CycleIndex, SystemClock, TtlCache, CENTER_TTL, CYCLE_TTL};
use orienta_resolver::{CityResolver, SequenceSimilarity, Similarity, TokenSetSimilarity};
use std::sync::Arc;

/// Everything the handlers share. The two TTL caches are the only mutable
/// state in the process; each guards its own index independently.
pub struct AppState {
    pub cycles: TtlCache<CycleIndex>,
    pub centers: TtlCache<CenterIndex>,
    pub cycle_source: CycleSource,
    pub center_source: CenterSource,
    pub resolver: CityResolver,
    pub model: Option<Box<dyn ModelClient>>,
    pub model_id: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let clock = Arc::new(SystemClock);
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.fetch_timeout)?);

        let sim: Box<dyn Similarity> = match config.similarity_backend.as_str() {
            "sequence" => Box::new(SequenceSimilarity),
            _ => Box::new(TokenSetSimilarity),
        };

        let model: Option<Box<dyn ModelClient>> = match &config.model_endpoint {
            Some(endpoint) => Some(Box::new(HttpModelClient::new(
                endpoint.clone(),
                config.model_id.clone(),
                config.model_api_key.clone(),
                config.fetch_timeout,
            )?)),
            None => {
                log::warn!("MODEL_ENDPOINT not set; /api/orientacion will be unavailable");
                None
            }
        };

        Ok(Self {
            cycles: TtlCache::new(CYCLE_TTL, clock.clone()),
            centers: TtlCache::new(CENTER_TTL, clock),
            cycle_source: CycleSource::new(Arc::clone(&fetcher), config.cycles_urls.clone()),
            center_source: CenterSource::new(fetcher, config.centers_urls.clone()),
            resolver: CityResolver::new(sim),
            model,
            model_id: config.model_id.clone(),
        })
    }
}
