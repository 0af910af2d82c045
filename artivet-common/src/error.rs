use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ArtivetError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("TOML Parsing Error: {0}")]
    Toml(#[from] Arc<toml::de::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A previously downloaded artifact file exists but holds no bytes.
    #[error("Fail to download artifact {artifact}, size is 0")]
    CorruptedArtifact { artifact: String },

    #[error("can not resolve artifact {artifact}: {cause}")]
    Resolution { artifact: String, cause: String },

    #[error("Failed to build dependency graph for {project}: {message}")]
    GraphConstruction { project: String, message: String },

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    Download(String, String, String),

    #[error("HttpError: {0}")]
    HttpError(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Invalid artifact pattern '{0}': {1}")]
    Pattern(String, String),

    #[error("Parsing Error in {0}: {1}")]
    Parse(&'static str, String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("IoError: {0}")]
    IoError(String),
}

impl ArtivetError {
    /// Only a zero-length download is worth another resolution pass.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ArtivetError::CorruptedArtifact { .. })
    }
}

impl From<std::io::Error> for ArtivetError {
    fn from(err: std::io::Error) -> Self {
        ArtivetError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for ArtivetError {
    fn from(err: reqwest::Error) -> Self {
        ArtivetError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for ArtivetError {
    fn from(err: serde_json::Error) -> Self {
        ArtivetError::Json(Arc::new(err))
    }
}

impl From<toml::de::Error> for ArtivetError {
    fn from(err: toml::de::Error) -> Self {
        ArtivetError::Toml(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ArtivetError>;
