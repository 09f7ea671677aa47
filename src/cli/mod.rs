//! CLI module for Recap.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{mask_secret, Output};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Recap - meeting transcription and summaries
///
/// Transcribes recordings with a local speech-to-text tool and summarizes them
/// with a chat-completion API.
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RECAP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default from config: 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default from config: 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// API key for the summarization endpoint (defaults to $OPENROUTER_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Transcribe and summarize a local recording, printing JSON
    Process {
        /// Audio file to process
        file: PathBuf,

        /// API key for the summarization endpoint (defaults to $OPENROUTER_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
