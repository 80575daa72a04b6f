//! In-memory dataset indices.
//!
//! Two independent instances of the same pattern: the cycle index (training
//! cycle + grade → municipalities) and the center index (municipality →
//! ordered school centers). Both are built whole from a parsed dataset and
//! kept warm by [`TtlCache`], which publishes immutable [`Snapshot`]s that
//! readers share without blocking each other.

mod cache;
mod centers;
mod clock;
mod cycles;
mod normalize;
mod ranker;
mod snapshot;

pub use cache::{Loaded, SnapshotSource, TtlCache, CENTER_TTL, CYCLE_TTL};
pub use centers::{CenterIndex, CenterRecord, REQUIRED_COLUMNS as CENTER_COLUMNS};
pub use clock::{Clock, SystemClock};
pub use cycles::{CycleIndex, REQUIRED_COLUMNS as CYCLE_COLUMNS};
pub use normalize::normalize;
pub use ranker::{fp_likelihood, LIKELY_FP_THRESHOLD};
pub use snapshot::Snapshot;
