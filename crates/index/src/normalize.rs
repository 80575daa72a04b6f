/// Canonical comparison form for every textual key: trimmed, lowercased,
/// internal whitespace runs collapsed to single spaces. Two keys are the
/// same iff their normalized forms are byte-equal.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
