use std::env;
use std::time::Duration;

// Enrollment dataset, current edition plus the previous one as fallback.
const CYCLES_CSV_URL_2025: &str = "https://dadesobertes.gva.es/dataset/a2183efe-f62c-48ec-bdbe-22a4b63c3832/resource/79af67de-71a2-48b1-bd6d-57a2996e2669/download/alumnos-matriculados-fp_2025.csv";
const CYCLES_CSV_URL_2024: &str = "https://dadesobertes.gva.es/dataset/04b2a721-9256-40f9-b45e-fa0c8e7000b5/resource/7ac929a5-9138-4791-924b-2f1f4c6777fc/download/alumnos-matriculados-fp_2024.csv";

// School directory with addresses, phones, websites and coordinates.
const CENTERS_CSV_URL: &str = "https://dadesobertes.gva.es/dataset/68eb1d94-76d3-4305-8507-e1aab7717d0e/resource/1aa53c3a-4639-41aa-ac85-d58254c428c0/download/centros-docentes-de-la-comunitat-valenciana.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    /// Enrollment dataset candidates, tried in order.
    pub cycles_urls: Vec<String>,
    /// School-directory dataset candidates, tried in order.
    pub centers_urls: Vec<String>,
    pub fetch_timeout: Duration,
    /// Completion endpoint for the guidance model; orientation requests are
    /// rejected when unset.
    pub model_endpoint: Option<String>,
    pub model_id: String,
    pub model_api_key: Option<String>,
    /// `token_set` (default) or `sequence`.
    pub similarity_backend: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env::var("ORIENTA_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            cycles_urls: vec![
                env::var("GVA_FP_CSV_URL_2025").unwrap_or_else(|_| CYCLES_CSV_URL_2025.to_string()),
                env::var("GVA_FP_CSV_URL_2024").unwrap_or_else(|_| CYCLES_CSV_URL_2024.to_string()),
            ],
            centers_urls: vec![
                env::var("GVA_CENTROS_CSV_URL").unwrap_or_else(|_| CENTERS_CSV_URL.to_string()),
            ],
            fetch_timeout: env::var("ORIENTA_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(orienta_dataset::DEFAULT_TIMEOUT),
            model_endpoint: env::var("MODEL_ENDPOINT").ok().filter(|v| !v.is_empty()),
            model_id: env::var("MODEL_ID").unwrap_or_else(|_| "amazon.nova-pro-v1:0".to_string()),
            model_api_key: env::var("MODEL_API_KEY").ok().filter(|v| !v.is_empty()),
            similarity_backend: env::var("ORIENTA_SIMILARITY")
                .unwrap_or_else(|_| "token_set".to_string()),
        }
    }
}
