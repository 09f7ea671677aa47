//! Prompt templates for Recap.
//!
//! The summary prompt can be customized by placing a `summary.toml` file in the
//! custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
}

/// Prompts for meeting summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: "You are a multilingual meeting assistant. Given a transcript, extract and group all important points, tasks with deadlines and people responsible, technical discussions, inquiries, meetings, and documentation needs. Return a well-structured response in the same language as the transcript.".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, letting files in `custom_dir` override the defaults.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }
}
