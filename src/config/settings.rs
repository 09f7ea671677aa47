//! Configuration settings for Recap.

use crate::error::{RecapError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub summarization: SummarizationSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Root under which per-request temporary directories are created.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Largest accepted upload, in mebibytes.
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_mb: 512,
        }
    }
}

impl ServerSettings {
    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Speech-to-text tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Program followed by any leading arguments, e.g. `["python3", "-m", "whisper"]`.
    pub command: Vec<String>,
    /// Language passed to `--language`.
    pub language: String,
    /// Model size passed to `--model`.
    pub model: String,
    /// Name the uploaded audio is stored under inside the request's temp directory.
    pub audio_file_name: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            command: vec!["whisper".to_string()],
            language: "auto".to_string(),
            model: "base".to_string(),
            audio_file_name: "audio.wav".to_string(),
        }
    }
}

/// Remote chat-completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationSettings {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Model name sent with each request.
    pub model: String,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    /// Request timeout in seconds. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for SummarizationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_secs: None,
        }
    }
}

impl SummarizationSettings {
    /// Read the API key from the configured environment variable.
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RecapError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let program_missing = self
            .transcription
            .command
            .first()
            .map(|p| p.trim().is_empty())
            .unwrap_or(true);
        if program_missing {
            return Err(RecapError::Config(
                "transcription.command must name a program".to_string(),
            ));
        }

        if Path::new(&self.transcription.audio_file_name)
            .extension()
            .is_none()
        {
            return Err(RecapError::Config(format!(
                "transcription.audio_file_name must have an extension: {}",
                self.transcription.audio_file_name
            )));
        }

        url::Url::parse(&self.summarization.endpoint).map_err(|e| {
            RecapError::Config(format!(
                "summarization.endpoint is not a valid URL ({}): {}",
                self.summarization.endpoint, e
            ))
        })?;

        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recap")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}
