#[derive(Debug, thiserror::Error)]
pub enum SymptomError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("malformed parse: {0}")]
    MalformedParse(String),
    #[error("failed to deserialize parse: {0}")]
    Deserialization(serde_json::Error),
    #[error("parser failed: {0}")]
    Parser(Box<dyn std::error::Error + Send + Sync>),
}

pub type SymptomResult<T> = std::result::Result<T, SymptomError>;
