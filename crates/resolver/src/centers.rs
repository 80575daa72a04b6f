use orienta_index::{fp_likelihood, normalize, CenterIndex, CenterRecord, LIKELY_FP_THRESHOLD};

pub const DEFAULT_LIMIT: usize = 25;
pub const MAX_LIMIT: usize = 100;

/// School centers for one municipality.
///
/// Exact normalized-key lookup only: an unknown municipality is an empty
/// answer, not a fuzzy guess. Groups come pre-ordered from the index
/// (likely-vocational first), so filtering and truncation preserve that
/// order. `limit` is clamped to [1, 100] and defaults to 25 when absent.
pub fn resolve_centers(
    index: &CenterIndex,
    municipality: &str,
    limit: Option<usize>,
    only_likely_fp: bool,
) -> Vec<CenterRecord> {
    let key = normalize(municipality);
    let Some(group) = index.by_municipality.get(&key) else {
        return Vec::new();
    };

    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    group
        .iter()
        .filter(|record| !only_likely_fp || fp_likelihood(record) >= LIKELY_FP_THRESHOLD)
        .take(limit)
        .cloned()
        .collect()
}
