use std::collections::BTreeSet;

/// Normalized string similarity in [0, 100].
///
/// The resolver is written against this seam and behaves identically with
/// either backend; which one is active is a startup decision, not a branch
/// inside the matching logic.
pub trait Similarity: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Plain character-sequence ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceSimilarity;

impl Similarity for SequenceSimilarity {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0;
        }
        to_percent(strsim::normalized_levenshtein(a, b))
    }
}

/// Token-set ratio: both sides are reduced to sorted unique-token views and
/// the best of the three pairwise sequence ratios over (intersection,
/// intersection+rest) wins. Word order and repeated words stop mattering,
/// which suits queries like "finanzas y administración" against
/// "administración y finanzas".
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetSimilarity;

impl Similarity for TokenSetSimilarity {
    fn name(&self) -> &'static str {
        "token_set"
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0;
        }

        let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
        let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

        let sect = join(tokens_a.intersection(&tokens_b).copied());
        let only_a = join(tokens_a.difference(&tokens_b).copied());
        let only_b = join(tokens_b.difference(&tokens_a).copied());

        let sect_a = concat(&sect, &only_a);
        let sect_b = concat(&sect, &only_b);

        let best = strsim::normalized_levenshtein(&sect, &sect_a)
            .max(strsim::normalized_levenshtein(&sect, &sect_b))
            .max(strsim::normalized_levenshtein(&sect_a, &sect_b));
        to_percent(best)
    }
}

/// Best-scoring candidate for `query`; ties keep the first candidate in
/// iteration order, so callers iterating sorted keys get stable results.
pub fn best_match<'a, I>(sim: &dyn Similarity, query: &str, choices: I) -> Option<(String, u8)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(String, u8)> = None;
    for choice in choices {
        let score = sim.score(query, choice);
        let improves = match &best {
            Some((_, best_score)) => score > *best_score,
            None => true,
        };
        if improves {
            best = Some((choice.to_string(), score));
        }
    }
    best
}

fn join<'a, I: Iterator<Item = &'a str>>(tokens: I) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}

fn concat(sect: &str, rest: &str) -> String {
    match (sect.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => sect.to_string(),
        _ => format!("{sect} {rest}"),
    }
}

fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}
