//! Process command - run the pipeline on a local recording.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::Path;

/// Transcribe and summarize `file`, printing the result as JSON on stdout.
pub async fn run_process(file: &Path, api_key: Option<String>, settings: Settings) -> Result<()> {
    preflight::check(Operation::Process, &settings, api_key.as_deref()).await?;

    let orchestrator = Orchestrator::new(&settings, api_key)?;

    let spinner = Output::spinner(&format!("Processing {}", file.display()));
    let result = orchestrator.process_file(file).await;
    spinner.finish_and_clear();

    let recap = match result {
        Ok(recap) => recap,
        Err(e) => {
            Output::error(&e.response_message());
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&recap)?);
    Ok(())
}
