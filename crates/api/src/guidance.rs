use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

const MAX_RECOMMENDATIONS: usize = 3;
const MAX_JOB_OUTLETS: usize = 6;
const DEFAULT_SALARY_NOTE: &str =
    "Rangos salariales orientativos (pueden variar por provincia, experiencia y empresa).";

const PROMPT_TEMPLATE: &str = r#"Eres un orientador académico experto en Formación Profesional (FP) en España.
Tu tarea: recomendar EXACTAMENTE 3 ciclos formativos de la COMUNIDAD VALENCIANA.

REGLAS OBLIGATORIAS:
- Devuelve SIEMPRE y SOLO un JSON válido.
- No uses markdown.
- No escribas texto fuera del JSON.
- EXACTAMENTE 3 recomendaciones.
- Deben ser ciclos reales y habituales de FP (CV).
- Incluye salidas laborales concretas y rangos salariales ORIENTATIVOS (no cifras "oficiales").
- Rangos salariales: en euros y preferiblemente ANUAL BRUTO (p. ej. "18.000–24.000 €/año").
- Añade un campo "nota_salarios" aclarando que son estimaciones.

FORMATO EXACTO (no añadas campos extra):
{
  "nota_salarios": "Texto breve aclarando que son rangos estimados en España/CV.",
  "recomendaciones": [
    {
      "ciclo": "Nombre del ciclo",
      "grado": "Medio o Superior",
      "familia_profesional": "Familia profesional",
      "motivo": "2-3 frases personalizadas",
      "salidas_laborales": ["Trabajo 1", "Trabajo 2", "Trabajo 3"],
      "rango_salarial": "18.000–24.000 €/año",
      "encaje": 0-100
    },
    {
      "ciclo": "...",
      "grado": "...",
      "familia_profesional": "...",
      "motivo": "...",
      "salidas_laborales": ["...","...","..."],
      "rango_salarial": "...",
      "encaje": 0-100
    },
    {
      "ciclo": "...",
      "grado": "...",
      "familia_profesional": "...",
      "motivo": "...",
      "salidas_laborales": ["...","...","..."],
      "rango_salarial": "...",
      "encaje": 0-100
    }
  ]
}

RESPUESTAS DEL ALUMNO (JSON):"#;

/// Orientation prompt for the guidance model, with the student's answers
/// embedded verbatim as JSON.
pub fn build_prompt(answers: &Value) -> String {
    let answers_json =
        serde_json::to_string_pretty(answers).unwrap_or_else(|_| "{}".to_string());
    format!("{PROMPT_TEMPLATE}\n{answers_json}")
}

/// The single external call: submit a text prompt, receive raw text back.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Client for a hosted completion endpoint speaking the message +
/// inference-config JSON shape. The reply text is extracted from
/// `output.message.content[0].text`; endpoints answering in another shape
/// fall back to the raw body, which the JSON rescue downstream handles.
pub struct HttpModelClient {
    client: Client,
    endpoint: String,
    model_id: String,
    api_key: Option<String>,
}

impl HttpModelClient {
    pub fn new(
        endpoint: String,
        model_id: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building model HTTP client")?;
        Ok(Self {
            client,
            endpoint,
            model_id,
            api_key,
        })
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let body = json!({
            "modelId": self.model_id,
            "messages": [{"role": "user", "content": [{"text": prompt}]}],
            "inferenceConfig": {"maxTokens": 1100, "temperature": 0.35, "topP": 0.9},
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let raw = request
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("POST {}", self.endpoint))?
            .text()
            .await
            .context("reading model response body")?;

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(_) => return Ok(raw),
        };
        Ok(parsed["output"]["message"]["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(raw))
    }
}

/// Strict JSON parse with a rescue pass: models sometimes wrap the object
/// in prose, so the slice between the first `{` and the last `}` gets a
/// second chance.
pub fn rescue_json(text: &str) -> Result<Value, String> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => serde_json::from_str(&text[start..=end])
            .map_err(|err| format!("no se pudo parsear el JSON rescatado: {err}")),
        _ => Err("no se encontró un bloque JSON en la respuesta".to_string()),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub ciclo: String,
    pub grado: String,
    pub familia_profesional: String,
    pub motivo: String,
    pub salidas_laborales: Vec<String>,
    pub rango_salarial: String,
    pub encaje: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Guidance {
    pub nota_salarios: String,
    pub recomendaciones: Vec<Recommendation>,
}

/// Clamp whatever the model returned into the response contract: a salary
/// note, at most three recommendations, at most six job outlets each, and
/// an integer fit score.
pub fn normalize_guidance(raw: &Value) -> Guidance {
    let nota_salarios = raw["nota_salarios"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SALARY_NOTE)
        .to_string();

    let recomendaciones = raw["recomendaciones"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .take(MAX_RECOMMENDATIONS)
                .filter_map(normalize_recommendation)
                .collect()
        })
        .unwrap_or_default();

    Guidance {
        nota_salarios,
        recomendaciones,
    }
}

fn normalize_recommendation(raw: &Value) -> Option<Recommendation> {
    let map = raw.as_object()?;

    let salidas = match map.get("salidas_laborales") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    let salidas_laborales: Vec<String> = salidas
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_JOB_OUTLETS)
        .collect();

    Some(Recommendation {
        ciclo: text_field(map, "ciclo"),
        grado: text_field(map, "grado"),
        familia_profesional: text_field(map, "familia_profesional"),
        motivo: text_field(map, "motivo"),
        salidas_laborales,
        rango_salarial: text_field(map, "rango_salarial"),
        encaje: fit_score(map.get("encaje")),
    })
}

fn text_field(map: &serde_json::Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string()
}

fn fit_score(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prompt_embeds_the_student_answers() {
        let answers = json!({"intereses": ["informática"], "nivel": "ESO"});
        let prompt = build_prompt(&answers);

        assert!(prompt.contains("EXACTAMENTE 3"));
        assert!(prompt.contains("informática"));
        assert!(prompt.ends_with('}'));
    }

    #[test]
    fn rescue_json_accepts_clean_payloads() {
        let value = rescue_json(r#"{"recomendaciones": []}"#).expect("clean JSON");
        assert!(value["recomendaciones"].as_array().is_some());
    }

    #[test]
    fn rescue_json_extracts_embedded_objects() {
        let text = "Claro, aquí tienes:\n{\"nota_salarios\": \"x\", \"recomendaciones\": []}\nEspero que ayude.";
        let value = rescue_json(text).expect("embedded JSON");
        assert_eq!(value["nota_salarios"], "x");
    }

    #[test]
    fn rescue_json_reports_when_no_object_exists() {
        let err = rescue_json("no hay nada parecido a un objeto").expect_err("no JSON");
        assert!(err.contains("no se encontró"));
    }

    #[test]
    fn normalization_truncates_recommendations_and_outlets() {
        let rec = json!({
            "ciclo": " Desarrollo de Aplicaciones Web ",
            "grado": "Superior",
            "familia_profesional": "Informática",
            "motivo": "Encaja con tus intereses.",
            "salidas_laborales": ["a", "b", "c", "d", "e", "f", "g", "h"],
            "rango_salarial": "20.000–28.000 €/año",
            "encaje": 92,
        });
        let raw = json!({
            "nota_salarios": "",
            "recomendaciones": vec![rec; 5],
        });

        let guidance = normalize_guidance(&raw);
        assert_eq!(guidance.nota_salarios, DEFAULT_SALARY_NOTE);
        assert_eq!(guidance.recomendaciones.len(), 3);

        let first = &guidance.recomendaciones[0];
        assert_eq!(first.ciclo, "Desarrollo de Aplicaciones Web");
        assert_eq!(first.salidas_laborales.len(), 6);
        assert_eq!(first.encaje, 92);
    }

    #[test]
    fn scalar_outlets_and_odd_fit_scores_are_coerced() {
        let raw = json!({
            "recomendaciones": [{
                "ciclo": "Cocina",
                "salidas_laborales": "Cocinero",
                "encaje": "85",
            }, {
                "ciclo": "Pastelería",
                "salidas_laborales": 42,
                "encaje": 77.9,
            }],
        });

        let guidance = normalize_guidance(&raw);
        assert_eq!(
            guidance.recomendaciones[0].salidas_laborales,
            vec!["Cocinero"]
        );
        assert_eq!(guidance.recomendaciones[0].encaje, 85);
        assert!(guidance.recomendaciones[1].salidas_laborales.is_empty());
        assert_eq!(guidance.recomendaciones[1].encaje, 77);
    }

    #[test]
    fn non_object_recommendations_are_dropped() {
        let raw = json!({
            "recomendaciones": ["texto suelto", {"ciclo": "Cocina"}],
        });
        let guidance = normalize_guidance(&raw);

        assert_eq!(guidance.recomendaciones.len(), 1);
        assert_eq!(guidance.recomendaciones[0].ciclo, "Cocina");
        assert_eq!(guidance.recomendaciones[0].encaje, 0);
    }
}
