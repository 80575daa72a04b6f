use crate::guidance;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use orienta_resolver::resolve_centers;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/orientacion", post(orientacion))
        .route("/api/ciudades", get(ciudades))
        .route("/api/ciudades/debug", get(ciudades_debug))
        .route("/api/municipios", get(municipios))
        .route("/api/centros", get(centros))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "mensaje": "Backend de orientación FP activo.",
        "endpoints": [
            "/health",
            "/api/orientacion",
            "/api/ciudades",
            "/api/ciudades/debug",
            "/api/municipios",
            "/api/centros",
        ],
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "modelId": state.model_id,
        "backend": state.resolver.backend(),
    }))
}

async fn orientacion(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let answers: Value = match serde_json::from_slice(&body) {
        Ok(value @ Value::Object(_)) => value,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "ok": false,
                    "error": "No llegó JSON válido. Envía Content-Type: application/json",
                })),
            );
        }
    };

    let Some(model) = &state.model else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "ok": false,
                "error": "Modelo generativo no configurado.",
            })),
        );
    };

    let prompt = guidance::build_prompt(&answers);
    match model.complete(&prompt).await {
        Ok(text) => match guidance::rescue_json(&text) {
            Ok(parsed) => {
                let data = guidance::normalize_guidance(&parsed);
                (StatusCode::OK, Json(json!({"ok": true, "data": data})))
            }
            // Parse failures answer 200 with the raw model output attached.
            Err(detail) => (
                StatusCode::OK,
                Json(json!({
                    "ok": false,
                    "error": "El modelo no devolvió JSON parseable.",
                    "detalle": detail,
                    "raw": text,
                })),
            ),
        },
        Err(err) => {
            log::error!("model invocation failed: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"ok": false, "error": format!("{err:#}")})),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct CiudadesParams {
    #[serde(default)]
    ciclo: String,
    #[serde(default)]
    grado: String,
}

async fn ciudades(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CiudadesParams>,
) -> (StatusCode, Json<Value>) {
    let ciclo = params.ciclo.trim();
    let grado = params.grado.trim();
    if ciclo.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error": "Falta parámetro 'ciclo'"})),
        );
    }

    let snapshot = state.cycles.current(&state.cycle_source).await;
    let (ciudades, info) = state.resolver.resolve_cities(&snapshot.index, ciclo, grado);

    let mut body = json!({
        "ok": true,
        "ciclo": ciclo,
        "grado": grado,
        "ciudades": ciudades,
        "count": ciudades.len(),
        "match": info,
    });
    if let Some(source) = &snapshot.source {
        body["source"] = json!(source);
    }
    if let Some(warning) = &snapshot.error {
        body["warning"] = json!(warning);
    }
    (StatusCode::OK, Json(body))
}

async fn municipios(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let snapshot = state.cycles.current(&state.cycle_source).await;
    if let Some(error) = &snapshot.error {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"ok": false, "error": error})),
        );
    }

    let municipios: Vec<&String> = snapshot.index.municipalities.iter().collect();
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "count": municipios.len(),
            "municipios": municipios,
            "source": &snapshot.source,
        })),
    )
}

/// Operational inspection: always reloads, then reports cardinalities and
/// the load outcome.
async fn ciudades_debug(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshot = state.cycles.force_refresh(&state.cycle_source).await;
    Json(json!({
        "ok": true,
        "index_pairs": snapshot.index.by_cycle_grade.len(),
        "index_cycles": snapshot.index.by_cycle_any.len(),
        "municipios_count": snapshot.index.municipalities.len(),
        "source": &snapshot.source,
        "error": &snapshot.error,
        "backend": state.resolver.backend(),
    }))
}

#[derive(Debug, Deserialize)]
struct CentrosParams {
    #[serde(default)]
    municipio: String,
    #[serde(default)]
    limit: String,
    #[serde(default)]
    only_fp: String,
}

async fn centros(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CentrosParams>,
) -> (StatusCode, Json<Value>) {
    let municipio = params.municipio.trim();
    if municipio.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error": "Falta parámetro 'municipio'"})),
        );
    }

    let snapshot = state.centers.current(&state.center_source).await;
    if let Some(error) = &snapshot.error {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"ok": false, "error": error})),
        );
    }

    // An unparseable limit falls back to the default.
    let limit = params.limit.trim().parse::<usize>().ok();
    let only_fp = params.only_fp.trim() == "1";
    let centros = resolve_centers(&snapshot.index, municipio, limit, only_fp);

    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "municipio": municipio,
            "count": centros.len(),
            "centros": centros,
            "source": &snapshot.source,
        })),
    )
}
