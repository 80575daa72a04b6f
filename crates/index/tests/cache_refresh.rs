use async_trait::async_trait;
use orienta_dataset::{parse_rows, DatasetError};
use orienta_index::{Clock, CycleIndex, Loaded, SnapshotSource, TtlCache, CYCLE_COLUMNS};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct ManualClock {
    ms: AtomicU64,
}

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            ms: AtomicU64::new(1_000),
        })
    }

    fn advance(&self, delta_ms: u64) {
        self.ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::SeqCst)
    }
}

/// Counts loads and parses a fixed payload through the real loader path.
struct CountingSource {
    loads: AtomicUsize,
    payload: &'static str,
    delay: Duration,
}

impl CountingSource {
    fn new(payload: &'static str) -> Self {
        Self {
            loads: AtomicUsize::new(0),
            payload,
            delay: Duration::ZERO,
        }
    }

    fn slow(payload: &'static str, delay: Duration) -> Self {
        Self {
            loads: AtomicUsize::new(0),
            payload,
            delay,
        }
    }

    fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource<CycleIndex> for CountingSource {
    async fn load(&self) -> Result<Loaded<CycleIndex>, DatasetError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let rows = parse_rows(self.payload, CYCLE_COLUMNS)?;
        Ok(Loaded {
            index: CycleIndex::from_rows(&rows),
            source: "test://enrollment.csv".to_string(),
        })
    }
}

const PAYLOAD: &str = "NOM_CICLO;NOM_GRADO;NOM_MUN\nCocina;Medio;Gandia\n";
const PAYLOAD_NO_GRADE_COLUMN: &str = "NOM_CICLO;NOM_MUN\nCocina;Gandia\n";

#[tokio::test]
async fn ttl_window_prevents_repeat_fetches() {
    let clock = ManualClock::new();
    let cache = TtlCache::new(Duration::from_secs(10), clock.clone() as Arc<dyn Clock>);
    let source = CountingSource::new(PAYLOAD);

    cache.current(&source).await;
    cache.current(&source).await;
    assert_eq!(source.load_count(), 1);

    clock.advance(10_001);
    cache.current(&source).await;
    assert_eq!(source.load_count(), 2);
}

#[tokio::test]
async fn racing_cold_readers_share_one_load() {
    let clock = ManualClock::new();
    let cache = Arc::new(TtlCache::new(
        Duration::from_secs(3600),
        clock as Arc<dyn Clock>,
    ));
    let source = Arc::new(CountingSource::slow(PAYLOAD, Duration::from_millis(50)));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let cache = Arc::clone(&cache);
        let source = Arc::clone(&source);
        handles.push(tokio::spawn(
            async move { cache.current(source.as_ref()).await },
        ));
    }

    let mut snapshots = Vec::new();
    for handle in handles {
        snapshots.push(handle.await.expect("reader task panicked"));
    }

    assert_eq!(source.load_count(), 1);
    let first = &snapshots[0];
    for snapshot in &snapshots {
        assert!(Arc::ptr_eq(first, snapshot));
    }
    assert!(first.index.by_cycle_any.contains_key("cocina"));
}

#[tokio::test]
async fn failed_load_is_published_once_per_ttl() {
    let clock = ManualClock::new();
    let cache = TtlCache::new(Duration::from_secs(10), clock.clone() as Arc<dyn Clock>);
    let source = CountingSource::new(PAYLOAD_NO_GRADE_COLUMN);

    let snapshot = cache.current(&source).await;
    let error = snapshot.error.as_deref().expect("load must fail");
    assert!(error.contains("NOM_GRADO"), "error names the missing column: {error}");
    assert!(snapshot.index.is_empty());
    assert!(snapshot.index.municipalities.is_empty());
    assert_eq!(snapshot.source, None);

    // Still inside the TTL: the broken upstream is not hammered.
    cache.current(&source).await;
    assert_eq!(source.load_count(), 1);

    clock.advance(10_001);
    cache.current(&source).await;
    assert_eq!(source.load_count(), 2);
}

#[tokio::test]
async fn force_refresh_reloads_regardless_of_freshness() {
    let clock = ManualClock::new();
    let cache = TtlCache::new(Duration::from_secs(3600), clock as Arc<dyn Clock>);
    let source = CountingSource::new(PAYLOAD);

    cache.current(&source).await;
    let forced = cache.force_refresh(&source).await;

    assert_eq!(source.load_count(), 2);
    assert_eq!(forced.source.as_deref(), Some("test://enrollment.csv"));
    assert!(Arc::ptr_eq(&forced, &cache.peek().expect("snapshot published")));
}
