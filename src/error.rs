use std::path::PathBuf;
use thiserror::Error;

/// Worker error taxonomy. Every variant is fatal: there is no retry or
/// partial-result recovery anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedMedia(PathBuf),

    #[error("Speech backend unavailable: {0}")]
    SpeechBackendUnavailable(String),

    #[error("Audio extraction failed: {0}")]
    AudioExtraction(String),

    #[error("Classifier not configured: {0}")]
    ClassifierNotConfigured(String),

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    #[error("Classifier response missing required schema keys")]
    SchemaInvalid,

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorkerError>;
