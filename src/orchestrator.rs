//! Pipeline orchestrator for Recap.
//!
//! Coordinates one upload from stored audio to transcript and summary. Each
//! run owns a fresh temporary directory that is removed when the run ends,
//! whichever way it ends.

use crate::config::{Prompts, Settings};
use crate::error::{RecapError, Result};
use crate::summary::{ChatCompletionSummarizer, Summarizer};
use crate::transcription::{Transcriber, WhisperCli};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Prefix of every per-run temporary directory.
const TEMP_DIR_PREFIX: &str = "recap-";

/// Transcript and summary of one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecap {
    pub transcript: String,
    pub summary: String,
}

/// The main orchestrator for the Recap pipeline.
pub struct Orchestrator {
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
    temp_root: PathBuf,
    audio_file_name: String,
}

impl Orchestrator {
    /// Create an orchestrator wired to the whisper CLI and the configured chat API.
    ///
    /// The API key is passed in rather than read here so callers decide where it comes from.
    pub fn new(settings: &Settings, api_key: Option<String>) -> Result<Self> {
        settings.validate()?;

        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let transcriber = Arc::new(WhisperCli::from_settings(&settings.transcription)?);
        let summarizer = Arc::new(ChatCompletionSummarizer::new(
            &settings.summarization,
            api_key,
            &prompts.summary.system,
        )?);

        info!(
            "Using {} ({} model) and {} ({})",
            transcriber.program(),
            settings.transcription.model,
            settings.summarization.endpoint,
            settings.summarization.model
        );

        Self::with_components(settings, transcriber, summarizer)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: &Settings,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<Self> {
        let temp_root = settings.temp_dir();
        std::fs::create_dir_all(&temp_root)?;

        Ok(Self {
            transcriber,
            summarizer,
            temp_root,
            audio_file_name: settings.transcription.audio_file_name.clone(),
        })
    }

    /// Directory under which per-run temporary directories are created.
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Transcribe and summarize an uploaded recording.
    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    pub async fn process_upload(&self, audio: &[u8]) -> Result<MeetingRecap> {
        let work_dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(&self.temp_root)?;

        let audio_path = work_dir.path().join(&self.audio_file_name);
        tokio::fs::write(&audio_path, audio).await?;
        debug!("Stored upload at {}", audio_path.display());

        self.process_stored(&audio_path).await
    }

    /// Transcribe and summarize a local recording.
    ///
    /// The file is copied into a fresh temporary directory first, so the
    /// tool's output never lands next to the original.
    pub async fn process_file(&self, audio_path: &Path) -> Result<MeetingRecap> {
        if !audio_path.is_file() {
            return Err(RecapError::InvalidInput(format!(
                "Not a file: {}",
                audio_path.display()
            )));
        }

        let audio = tokio::fs::read(audio_path).await?;
        self.process_upload(&audio).await
    }

    async fn process_stored(&self, audio_path: &Path) -> Result<MeetingRecap> {
        let transcript = self.transcriber.transcribe(audio_path).await?;
        if transcript.trim().is_empty() {
            return Err(RecapError::EmptyTranscript);
        }
        info!("Transcribed {} characters", transcript.chars().count());

        let summary = self.summarizer.summarize(&transcript).await?;

        Ok(MeetingRecap {
            transcript,
            summary,
        })
    }
}
