use crate::centers::CenterRecord;

/// Records scoring at least this much are treated as "probably teaches
/// vocational training" by the likely-FP filter.
pub const LIKELY_FP_THRESHOLD: i32 = 10;

/// Keyword heuristic for how likely a center is to offer vocational
/// training. The directory dataset carries no explicit flag, so integrated
/// FP centers are recognized by their naming conventions and pushed to the
/// top of each municipality group.
///
/// The score is additive over a fixed rule set and is only ever used for
/// ordering and filtering, never shown to users.
pub fn fp_likelihood(record: &CenterRecord) -> i32 {
    let haystack = format!("{} {}", record.tipo, record.nombre).to_uppercase();

    let mut score = 0;
    if haystack.contains("CIPFP")
        || haystack.contains("CENTRE INTEGRAT")
        || haystack.contains("CENTRO INTEGRADO")
    {
        score += 50;
    }
    if haystack.contains("FORMACIÓN PROFESIONAL") || haystack.contains("FORMACION PROFESIONAL") {
        score += 35;
    }
    if haystack.contains("FP") {
        score += 10;
    }
    if haystack.contains("IES") || haystack.contains("INSTITUTO") {
        score += 6;
    }
    score
}
