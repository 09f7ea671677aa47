//! Transcription module for Recap.
//!
//! Speech-to-text is delegated to an external command-line tool. The default
//! implementation drives the `whisper` CLI and reads back its plain-text output.

mod whisper;

pub use whisper::WhisperCli;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file and return the plain-text transcript.
    ///
    /// Any files the implementation writes go next to `audio_path`.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}
