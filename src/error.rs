//! Error types for Recap.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for Recap operations.
#[derive(Error, Debug)]
pub enum RecapError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transcription tool ran and reported a failure. Holds its diagnostic output.
    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Transcript file not found: {}", .0.display())]
    TranscriptNotFound(PathBuf),

    #[error("Transcript is empty")]
    EmptyTranscript,

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RecapError {
    /// Message placed in the `error` field of an HTTP error body.
    ///
    /// Tool diagnostics are passed through verbatim so callers see exactly
    /// what the transcription tool printed.
    pub fn response_message(&self) -> String {
        match self {
            RecapError::Transcription(diagnostic) => diagnostic.clone(),
            RecapError::TranscriptNotFound(_) => "Transcript file not found".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for Recap operations.
pub type Result<T> = std::result::Result<T, RecapError>;
