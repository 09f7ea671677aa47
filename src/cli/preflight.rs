//! Pre-flight checks before expensive operations.
//!
//! Validates that the transcription tool and credentials are available
//! before starting work that would otherwise fail midway.

use crate::config::{Settings, SummarizationSettings};
use crate::error::{RecapError, Result};
use std::process::Stdio;
use tokio::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Serving needs valid settings; missing tools only fail individual requests.
    Serve,
    /// Processing a file needs the transcription tool and an API key.
    Process,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub async fn check(operation: Operation, settings: &Settings, api_key: Option<&str>) -> Result<()> {
    settings.validate()?;

    match operation {
        Operation::Serve => {}
        Operation::Process => {
            check_api_key(api_key, &settings.summarization)?;
            check_transcriber(&settings.transcription.command).await?;
        }
    }
    Ok(())
}

/// Check that an API key was supplied.
pub fn check_api_key(api_key: Option<&str>, settings: &SummarizationSettings) -> Result<()> {
    match api_key {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(RecapError::Config(format!(
            "{} not set. Set it with: export {}='sk-or-...' or pass --api-key",
            settings.api_key_env, settings.api_key_env
        ))),
    }
}

/// Check that the transcription command can be started.
pub async fn check_transcriber(command: &[String]) -> Result<()> {
    let (program, leading_args) = command.split_first().ok_or_else(|| {
        RecapError::Config("transcription.command must name a program".to_string())
    })?;

    match Command::new(program)
        .args(leading_args)
        .arg("--help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        Ok(status) if status.success() => Ok(()),
        Ok(_) => Err(RecapError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            program
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(RecapError::ToolNotFound(program.clone()))
        }
        Err(e) => Err(RecapError::ToolNotFound(format!("{}: {}", program, e))),
    }
}
