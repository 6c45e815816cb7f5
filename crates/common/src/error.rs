use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Timestamp formatting failed: {0}")]
    Format(#[from] time::error::Format),

    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
