use crate::clock::Clock;
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use orienta_dataset::DatasetError;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;

/// The enrollment dataset is republished daily.
pub const CYCLE_TTL: Duration = Duration::from_secs(24 * 3600);
/// The school directory changes rarely; a week of staleness is acceptable.
pub const CENTER_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// A successfully loaded and built index plus the location it came from.
pub struct Loaded<T> {
    pub index: T,
    pub source: String,
}

/// One whole-dataset fetch + rebuild. The cache knows nothing about HTTP or
/// parsing; it only schedules this call and publishes its outcome.
#[async_trait]
pub trait SnapshotSource<T>: Send + Sync {
    async fn load(&self) -> Result<Loaded<T>, DatasetError>;
}

/// Guards one shared index behind a refresh-if-stale policy.
///
/// The common case takes the published `Arc<Snapshot>` under a short read
/// lock and returns immediately when it is inside the TTL window. Only the
/// refresh path serializes, on a per-cache mutex, and the freshness test is
/// repeated after acquiring it: callers that raced a refresh wait on the
/// lock and then read the snapshot the winner published instead of
/// downloading the dataset a second time.
///
/// A failed load publishes an empty index carrying the error. That snapshot
/// satisfies the freshness window like any other, so a broken upstream is
/// retried once per TTL, not once per request.
pub struct TtlCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<Arc<Snapshot<T>>>>,
    refresh: Mutex<()>,
}

impl<T: Default + Send + Sync> TtlCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            current: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// The published snapshot, fresh or stale, without triggering a refresh.
    pub fn peek(&self) -> Option<Arc<Snapshot<T>>> {
        self.current.read().expect("snapshot lock poisoned").clone()
    }

    /// The current snapshot, refreshing through `source` first if the
    /// published one is missing or older than the TTL.
    pub async fn current(&self, source: &dyn SnapshotSource<T>) -> Arc<Snapshot<T>> {
        if let Some(snapshot) = self.fresh_snapshot() {
            return snapshot;
        }

        let _guard = self.refresh.lock().await;
        if let Some(snapshot) = self.fresh_snapshot() {
            return snapshot;
        }
        self.reload(source).await
    }

    /// Reload unconditionally: exactly one load, same refresh lock, outcome
    /// surfaced in the returned snapshot.
    pub async fn force_refresh(&self, source: &dyn SnapshotSource<T>) -> Arc<Snapshot<T>> {
        let _guard = self.refresh.lock().await;
        self.reload(source).await
    }

    fn fresh_snapshot(&self) -> Option<Arc<Snapshot<T>>> {
        let now = self.clock.now_ms();
        self.peek()
            .filter(|snapshot| snapshot.is_fresh(now, self.ttl))
    }

    async fn reload(&self, source: &dyn SnapshotSource<T>) -> Arc<Snapshot<T>> {
        let snapshot = match source.load().await {
            Ok(loaded) => Snapshot {
                index: loaded.index,
                source: Some(loaded.source),
                loaded_at_ms: self.clock.now_ms(),
                error: None,
            },
            Err(err) => {
                log::error!("index refresh failed: {err}");
                Snapshot {
                    index: T::default(),
                    source: None,
                    loaded_at_ms: self.clock.now_ms(),
                    error: Some(err.to_string()),
                }
            }
        };

        let snapshot = Arc::new(snapshot);
        *self.current.write().expect("snapshot lock poisoned") = Some(Arc::clone(&snapshot));
        snapshot
    }
}
