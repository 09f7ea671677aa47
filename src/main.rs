//! Recap CLI entry point.

use anyhow::Result;
use clap::Parser;
use recap::cli::{commands, Cli, Commands};
use recap::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load_from(cli.config.as_deref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("recap={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Serve {
            host,
            port,
            api_key,
        } => {
            let api_key = api_key
                .clone()
                .or_else(|| settings.summarization.api_key_from_env());
            commands::run_serve(host.clone(), *port, api_key, settings).await?;
        }

        Commands::Process { file, api_key } => {
            let api_key = api_key
                .clone()
                .or_else(|| settings.summarization.api_key_from_env());
            commands::run_process(file, api_key, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, cli.config.as_deref()).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, cli.config.as_deref(), settings)?;
        }
    }

    Ok(())
}
