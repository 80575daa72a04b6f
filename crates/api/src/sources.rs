use async_trait::async_trait;
use orienta_dataset::{decode_text, fetch_first, parse_rows, DatasetError, Fetcher};
use orienta_index::{
    CenterIndex, CycleIndex, Loaded, SnapshotSource, CENTER_COLUMNS, CYCLE_COLUMNS,
};
use std::sync::Arc;

/// Downloads the enrollment dataset and rebuilds the cycle index.
pub struct CycleSource {
    fetcher: Arc<dyn Fetcher>,
    urls: Vec<String>,
}

impl CycleSource {
    pub fn new(fetcher: Arc<dyn Fetcher>, urls: Vec<String>) -> Self {
        Self { fetcher, urls }
    }
}

#[async_trait]
impl SnapshotSource<CycleIndex> for CycleSource {
    async fn load(&self) -> Result<Loaded<CycleIndex>, DatasetError> {
        let (bytes, source) = fetch_first(self.fetcher.as_ref(), &self.urls).await?;
        let rows = parse_rows(&decode_text(&bytes), CYCLE_COLUMNS)?;
        let index = CycleIndex::from_rows(&rows);
        log::info!(
            "cycle index rebuilt from {source}: {} rows, {} (cycle, grade) pairs, {} municipalities",
            rows.len(),
            index.by_cycle_grade.len(),
            index.municipalities.len()
        );
        Ok(Loaded { index, source })
    }
}

/// Downloads the school directory and rebuilds the center index.
pub struct CenterSource {
    fetcher: Arc<dyn Fetcher>,
    urls: Vec<String>,
}

impl CenterSource {
    pub fn new(fetcher: Arc<dyn Fetcher>, urls: Vec<String>) -> Self {
        Self { fetcher, urls }
    }
}

#[async_trait]
impl SnapshotSource<CenterIndex> for CenterSource {
    async fn load(&self) -> Result<Loaded<CenterIndex>, DatasetError> {
        let (bytes, source) = fetch_first(self.fetcher.as_ref(), &self.urls).await?;
        let rows = parse_rows(&decode_text(&bytes), CENTER_COLUMNS)?;
        let index = CenterIndex::from_rows(&rows);
        log::info!(
            "center index rebuilt from {source}: {} rows, {} municipalities",
            rows.len(),
            index.by_municipality.len()
        );
        Ok(Loaded { index, source })
    }
}
