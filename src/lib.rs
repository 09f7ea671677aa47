//! Recap - Meeting Transcription and Summaries
//!
//! An HTTP service that turns an uploaded meeting recording into a transcript
//! and a structured summary.
//!
//! # Overview
//!
//! For each upload, Recap:
//! - Stores the audio in a temporary directory owned by that request
//! - Runs a speech-to-text command-line tool (the `whisper` CLI by default)
//! - Sends the transcript to a chat-completion API (OpenRouter by default)
//!   with instructions to extract action items, owners, deadlines, technical
//!   discussion points, and documentation needs
//! - Returns `{"transcript": ..., "summary": ...}` and removes the directory
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `transcription` - Speech-to-text via an external tool
//! - `summary` - Summarization via a remote chat-completion API
//! - `orchestrator` - Pipeline coordination
//! - `cli` - Command-line interface and the HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use recap::config::Settings;
//! use recap::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::default();
//!     let api_key = settings.summarization.api_key_from_env();
//!     let orchestrator = Orchestrator::new(&settings, api_key)?;
//!
//!     let audio = std::fs::read("standup.wav")?;
//!     let recap = orchestrator.process_upload(&audio).await?;
//!     println!("{}", recap.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod summary;
pub mod transcription;

pub use error::{RecapError, Result};
