//! Query resolution over the dataset indices.
//!
//! Free-text cycle and grade queries go through a tiered matcher (exact
//! key, exact cycle, fuzzy) backed by a pluggable [`Similarity`] strategy;
//! municipality lookups for school centers are exact-key only.

mod centers;
mod cities;
mod similarity;

pub use centers::{resolve_centers, DEFAULT_LIMIT, MAX_LIMIT};
pub use cities::{CityResolver, MatchInfo, MIN_FUZZY_SCORE};
pub use similarity::{best_match, SequenceSimilarity, Similarity, TokenSetSimilarity};
