use std::time::{SystemTime, UNIX_EPOCH};

/// Time source for TTL checks. Injected so tests can drive snapshot expiry
/// deterministically instead of sleeping.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|dur| u64::try_from(dur.as_millis()).ok())
            .unwrap_or(0)
    }
}
