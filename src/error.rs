use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedlineError {
    #[error("Failed to parse document: {0}")]
    DocumentParse(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Model call failed: {0}")]
    ModelCall(String),

    #[error("Could not parse model response: {0}")]
    ResponseParse(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Document generation failed: {0}")]
    DocumentGeneration(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(reqwest::Error),
}

/// Request URLs are dropped so that nothing carried in them reaches a caller.
#[cfg(feature = "gemini")]
impl From<reqwest::Error> for RedlineError {
    fn from(err: reqwest::Error) -> Self {
        RedlineError::HttpError(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, RedlineError>;
