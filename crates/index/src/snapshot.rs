use std::time::Duration;

/// One immutable, fully built index plus its provenance.
///
/// A refresh builds the next snapshot off to the side and publishes it
/// whole behind an `Arc`; live snapshots are replaced, never mutated. A
/// failed load still publishes (empty index, `error` set) so readers always
/// have something coherent to look at.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub index: T,
    /// Location the dataset was downloaded from, when the load succeeded.
    pub source: Option<String>,
    pub loaded_at_ms: u64,
    /// Last load failure, verbatim, for surfacing as a response warning.
    pub error: Option<String>,
}

impl<T> Snapshot<T> {
    pub fn is_fresh(&self, now_ms: u64, ttl: Duration) -> bool {
        now_ms.saturating_sub(self.loaded_at_ms) < ttl.as_millis() as u64
    }
}
