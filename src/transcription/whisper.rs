//! Whisper command-line transcription.

use super::Transcriber;
use crate::config::TranscriptionSettings;
use crate::error::{RecapError, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Extension of the transcript file written by `--output_format txt`.
const TRANSCRIPT_EXTENSION: &str = "txt";

/// Transcriber backed by the `whisper` CLI (or anything accepting its flags).
#[derive(Debug, Clone)]
pub struct WhisperCli {
    program: String,
    leading_args: Vec<String>,
    language: String,
    model: String,
}

impl WhisperCli {
    /// Create a transcriber from configuration.
    pub fn from_settings(settings: &TranscriptionSettings) -> Result<Self> {
        let (program, leading_args) = settings.command.split_first().ok_or_else(|| {
            RecapError::Config("transcription.command must name a program".to_string())
        })?;

        Ok(Self {
            program: program.clone(),
            leading_args: leading_args.to_vec(),
            language: settings.language.clone(),
            model: settings.model.clone(),
        })
    }

    /// The executable that will be spawned.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed after the program name.
    fn arguments(&self, audio_path: &Path, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.leading_args.iter().map(OsString::from).collect();
        args.push(audio_path.into());
        args.extend(
            [
                "--language",
                self.language.as_str(),
                "--model",
                self.model.as_str(),
                "--output_format",
                TRANSCRIPT_EXTENSION,
                "--output_dir",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(output_dir.into());
        args
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let output_dir = audio_path.parent().ok_or_else(|| {
            RecapError::InvalidInput(format!(
                "Audio path has no parent directory: {}",
                audio_path.display()
            ))
        })?;

        info!("Running {} on uploaded audio", self.program);

        let result = Command::new(&self.program)
            .args(self.arguments(audio_path, output_dir))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RecapError::ToolNotFound(self.program.clone()));
            }
            Err(e) => {
                return Err(RecapError::Transcription(format!(
                    "{} execution failed: {e}",
                    self.program
                )));
            }
        };

        if !output.status.success() {
            debug!(status = %output.status, "Transcription tool exited with failure");
            return Err(RecapError::Transcription(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        let transcript_path = audio_path.with_extension(TRANSCRIPT_EXTENSION);
        match tokio::fs::read_to_string(&transcript_path).await {
            Ok(transcript) => {
                debug!("Read {} bytes of transcript", transcript.len());
                Ok(transcript)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RecapError::TranscriptNotFound(transcript_path))
            }
            Err(e) => Err(e.into()),
        }
    }
}
