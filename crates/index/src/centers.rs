use crate::normalize::normalize;
use crate::ranker::fp_likelihood;
use orienta_dataset::RawRow;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Columns the school-directory dataset must expose.
pub const REQUIRED_COLUMNS: &[&str] = &["denominacion", "direccion", "localidad"];

/// Placeholder values the directory dataset uses for "no phone".
const JUNK_PHONE: &[&str] = &["0", "0.0", "nan", "None"];
/// Placeholder values the directory dataset uses for "no website".
const JUNK_URL: &[&str] = &["nan", "None"];

/// One school center as served to clients. Field names match the wire
/// shape of the directory dataset.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CenterRecord {
    pub codigo: String,
    pub nombre: String,
    pub tipo: String,
    pub regimen: String,
    pub direccion: String,
    pub numero: String,
    pub cp: String,
    pub localidad: String,
    pub provincia: String,
    pub telefono: String,
    pub url: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// School centers grouped by normalized municipality, each group ordered
/// likely-vocational first, then by name.
#[derive(Debug, Clone, Default)]
pub struct CenterIndex {
    pub by_municipality: BTreeMap<String, Vec<CenterRecord>>,
}

impl CenterIndex {
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let mut by_municipality: BTreeMap<String, Vec<CenterRecord>> = BTreeMap::new();

        for row in rows {
            let localidad = field(row, "localidad").trim();
            if localidad.is_empty() {
                continue;
            }

            let record = CenterRecord {
                codigo: field(row, "codigo").to_string(),
                nombre: field(row, "denominacion").trim().to_string(),
                tipo: field(row, "denominacion_generica_es").trim().to_string(),
                regimen: field(row, "regimen").trim().to_string(),
                direccion: field(row, "direccion").trim().to_string(),
                numero: field(row, "numero").trim().to_string(),
                cp: field(row, "codigo_postal").to_string(),
                localidad: localidad.to_string(),
                provincia: field(row, "provincia").trim().to_string(),
                telefono: clean_sentinel(field(row, "telefono").trim(), JUNK_PHONE),
                url: clean_sentinel(field(row, "url_es").trim(), JUNK_URL),
                lat: parse_coordinate(field(row, "latitud")),
                lon: parse_coordinate(field(row, "longitud")),
            };

            by_municipality
                .entry(normalize(localidad))
                .or_default()
                .push(record);
        }

        for group in by_municipality.values_mut() {
            group.sort_by_cached_key(|record| {
                (Reverse(fp_likelihood(record)), record.nombre.to_lowercase())
            });
        }

        Self { by_municipality }
    }

    pub fn is_empty(&self) -> bool {
        self.by_municipality.is_empty()
    }
}

/// Coerce a raw coordinate to a float, treating parse failures and NaN as
/// absent.
fn parse_coordinate(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

fn clean_sentinel(value: &str, junk: &[&str]) -> String {
    if junk.contains(&value) {
        String::new()
    } else {
        value.to_string()
    }
}

fn field<'a>(row: &'a RawRow, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(entries: &[(&str, &str)]) -> RawRow {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn center_row(name: &str, tipo: &str, localidad: &str) -> RawRow {
        row(&[
            ("denominacion", name),
            ("denominacion_generica_es", tipo),
            ("direccion", "C/ Mayor"),
            ("localidad", localidad),
        ])
    }

    #[test]
    fn groups_under_normalized_municipality() {
        let rows = vec![
            center_row("IES Ausiàs March", "INSTITUTO", "  GANDIA "),
            center_row("CEIP El Romeral", "COLEGIO", "gandia"),
        ];
        let index = CenterIndex::from_rows(&rows);

        assert_eq!(index.by_municipality.len(), 1);
        assert_eq!(index.by_municipality["gandia"].len(), 2);
    }

    #[test]
    fn rows_without_municipality_are_dropped() {
        let rows = vec![center_row("IES Ausiàs March", "INSTITUTO", "  ")];
        let index = CenterIndex::from_rows(&rows);
        assert!(index.is_empty());
    }

    #[test]
    fn likely_fp_centers_sort_first_then_by_name() {
        let rows = vec![
            center_row("Zzz Academia", "CENTRO PRIVADO", "Valencia"),
            center_row("IES Benlliure", "INSTITUTO DE EDUCACIÓN SECUNDARIA", "Valencia"),
            center_row("CIPFP Ausiàs March", "CENTRO INTEGRADO DE FP", "Valencia"),
            center_row("IES Abastos", "INSTITUTO DE EDUCACIÓN SECUNDARIA", "Valencia"),
        ];
        let index = CenterIndex::from_rows(&rows);

        let names: Vec<&str> = index.by_municipality["valencia"]
            .iter()
            .map(|r| r.nombre.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["CIPFP Ausiàs March", "IES Abastos", "IES Benlliure", "Zzz Academia"]
        );
    }

    #[test]
    fn phone_and_url_sentinels_become_empty() {
        for junk in ["0", "0.0", "nan", "None"] {
            let mut raw = center_row("IES Benlliure", "INSTITUTO", "Valencia");
            raw.insert("telefono".to_string(), junk.to_string());
            let index = CenterIndex::from_rows(&[raw]);
            assert_eq!(index.by_municipality["valencia"][0].telefono, "");
        }

        let mut raw = center_row("IES Benlliure", "INSTITUTO", "Valencia");
        raw.insert("url_es".to_string(), "nan".to_string());
        let index = CenterIndex::from_rows(&[raw]);
        assert_eq!(index.by_municipality["valencia"][0].url, "");
    }

    #[test]
    fn real_phone_numbers_survive_cleanup() {
        let mut raw = center_row("IES Benlliure", "INSTITUTO", "Valencia");
        raw.insert("telefono".to_string(), "961234567".to_string());
        let index = CenterIndex::from_rows(&[raw]);
        assert_eq!(index.by_municipality["valencia"][0].telefono, "961234567");
    }

    #[test]
    fn bad_coordinates_are_absent() {
        let mut raw = center_row("IES Benlliure", "INSTITUTO", "Valencia");
        raw.insert("latitud".to_string(), "39.47".to_string());
        raw.insert("longitud".to_string(), "nan".to_string());
        let index = CenterIndex::from_rows(&[raw]);

        let record = &index.by_municipality["valencia"][0];
        assert_eq!(record.lat, Some(39.47));
        assert_eq!(record.lon, None);

        let mut raw = center_row("IES Benlliure", "INSTITUTO", "Valencia");
        raw.insert("latitud".to_string(), "no-coord".to_string());
        let index = CenterIndex::from_rows(&[raw]);
        assert_eq!(index.by_municipality["valencia"][0].lat, None);
    }
}
