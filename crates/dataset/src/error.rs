use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

/// One failed download candidate, kept so the final error reports the
/// whole chain of attempts.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    pub url: String,
    pub error: String,
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("could not download dataset from any candidate location: {}", render_attempts(.0))]
    Fetch(Vec<FetchAttempt>),

    #[error("dataset downloaded but missing columns {missing:?}; detected columns: {found:?}")]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },
}

fn render_attempts(attempts: &[FetchAttempt]) -> String {
    attempts
        .iter()
        .map(|attempt| format!("{}: {}", attempt.url, attempt.error))
        .collect::<Vec<_>>()
        .join("; ")
}
