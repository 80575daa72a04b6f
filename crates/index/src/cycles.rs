use crate::normalize::normalize;
use orienta_dataset::RawRow;
use std::collections::{BTreeMap, BTreeSet};

/// Columns the enrollment dataset must expose before an index is built.
pub const REQUIRED_COLUMNS: &[&str] = &["NOM_CICLO", "NOM_MUN", "NOM_GRADO"];

/// Lookup tables answering "which municipalities offer this training cycle".
///
/// Keys are normalized; municipality values keep the dataset's display
/// casing. BTree containers give deterministic iteration, so fuzzy
/// tie-breaks and serialized output are stable across rebuilds.
#[derive(Debug, Clone, Default)]
pub struct CycleIndex {
    /// (normalized cycle, normalized grade) → municipality display names.
    pub by_cycle_grade: BTreeMap<(String, String), BTreeSet<String>>,
    /// normalized cycle → municipality display names across all grades.
    pub by_cycle_any: BTreeMap<String, BTreeSet<String>>,
    /// Every distinct municipality seen in the dataset, sorted.
    pub municipalities: BTreeSet<String>,
}

impl CycleIndex {
    /// Build the index from parsed rows. Rows with no cycle or no
    /// municipality are excluded from both maps, but a present municipality
    /// still counts toward the global municipality set.
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let mut index = Self::default();

        for row in rows {
            let cycle = normalize(field(row, "NOM_CICLO"));
            let grade = normalize(field(row, "NOM_GRADO"));
            let municipality = field(row, "NOM_MUN").trim();

            if !municipality.is_empty() {
                index.municipalities.insert(municipality.to_string());
            }
            if cycle.is_empty() || municipality.is_empty() {
                continue;
            }

            index
                .by_cycle_grade
                .entry((cycle.clone(), grade))
                .or_default()
                .insert(municipality.to_string());
            index
                .by_cycle_any
                .entry(cycle)
                .or_default()
                .insert(municipality.to_string());
        }

        index
    }

    pub fn is_empty(&self) -> bool {
        self.by_cycle_grade.is_empty() && self.by_cycle_any.is_empty()
    }

    /// Every grade the dataset pairs with `cycle` (normalized key).
    pub fn grades_for(&self, cycle: &str) -> Vec<String> {
        self.by_cycle_grade
            .keys()
            .filter(|(c, _)| c == cycle)
            .map(|(_, grade)| grade.clone())
            .collect()
    }
}

fn field<'a>(row: &'a RawRow, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}
