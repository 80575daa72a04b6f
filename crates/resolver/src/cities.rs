use crate::similarity::{best_match, Similarity};
use orienta_index::{normalize, CycleIndex};
use serde::Serialize;

/// Hard cutoff for fuzzy matches. A best score below this means the query
/// is treated as unrecognized and resolves to nothing, rather than risking
/// municipalities for an unrelated cycle.
pub const MIN_FUZZY_SCORE: u8 = 55;

/// How a query was matched, surfaced to callers so clients can show
/// confidence next to the result list.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MatchInfo {
    /// Active similarity backend, for diagnostics.
    pub backend: String,
    pub matched_ciclo: String,
    pub match_score: u8,
    pub matched_grado: String,
    pub grado_score: u8,
}

/// Resolves free-text cycle/grade queries against a [`CycleIndex`]:
/// exact key first, then exact cycle with any grade, then fuzzy matching
/// through the configured [`Similarity`] backend.
pub struct CityResolver {
    sim: Box<dyn Similarity>,
}

impl CityResolver {
    pub fn new(sim: Box<dyn Similarity>) -> Self {
        Self { sim }
    }

    pub fn backend(&self) -> &'static str {
        self.sim.name()
    }

    /// Municipalities offering `cycle`, optionally narrowed by `grade`.
    ///
    /// Tiers short-circuit in order; see [`MatchInfo`] for what matched and
    /// how confidently. When the cycle matched fuzzily but the grade query
    /// cannot be disambiguated, the any-grade union is returned instead of
    /// nothing. That union is an approximation: it may include
    /// municipalities that only offer the cycle at other grades.
    pub fn resolve_cities(
        &self,
        index: &CycleIndex,
        cycle: &str,
        grade: &str,
    ) -> (Vec<String>, MatchInfo) {
        let cycle_n = normalize(cycle);
        let grade_n = normalize(grade);

        let mut info = MatchInfo {
            backend: self.sim.name().to_string(),
            ..MatchInfo::default()
        };

        if index.is_empty() {
            return (Vec::new(), info);
        }

        // Exact (cycle, grade) key.
        if !cycle_n.is_empty() && !grade_n.is_empty() {
            if let Some(cities) = index.by_cycle_grade.get(&(cycle_n.clone(), grade_n.clone())) {
                if !cities.is_empty() {
                    info.matched_ciclo = cycle_n;
                    info.match_score = 100;
                    info.matched_grado = grade_n;
                    info.grado_score = 100;
                    return (cities.iter().cloned().collect(), info);
                }
            }
        }

        // Exact cycle, any grade.
        if !cycle_n.is_empty() {
            if let Some(cities) = index.by_cycle_any.get(&cycle_n) {
                if !cities.is_empty() {
                    info.matched_ciclo = cycle_n;
                    info.match_score = 100;
                    return (cities.iter().cloned().collect(), info);
                }
            }
        }

        if cycle_n.is_empty() {
            return (Vec::new(), info);
        }

        // Fuzzy cycle against every known cycle key.
        let Some((matched_cycle, score)) = best_match(
            self.sim.as_ref(),
            &cycle_n,
            index.by_cycle_any.keys().map(String::as_str),
        ) else {
            return (Vec::new(), info);
        };
        info.matched_ciclo = matched_cycle.clone();
        info.match_score = score;

        if score < MIN_FUZZY_SCORE {
            log::debug!("cycle query {cycle_n:?} best match {matched_cycle:?} below cutoff ({score})");
            return (Vec::new(), info);
        }

        // Grade sub-match, restricted to grades seen with the matched cycle.
        if !grade_n.is_empty() {
            let grades = index.grades_for(&matched_cycle);
            if let Some((matched_grade, grade_score)) = best_match(
                self.sim.as_ref(),
                &grade_n,
                grades.iter().map(String::as_str),
            ) {
                info.matched_grado = matched_grade.clone();
                info.grado_score = grade_score;

                if grade_score >= MIN_FUZZY_SCORE {
                    if let Some(cities) =
                        index.by_cycle_grade.get(&(matched_cycle.clone(), matched_grade))
                    {
                        if !cities.is_empty() {
                            return (cities.iter().cloned().collect(), info);
                        }
                    }
                }
            }
        }

        // Grade disambiguation failed; keep the confident cycle match and
        // answer with the any-grade union.
        let cities = index
            .by_cycle_any
            .get(&matched_cycle)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        (cities, info)
    }
}
