//! Doctor command - verify system requirements and configuration.

use crate::cli::preflight::check_transcriber;
use crate::cli::{mask_secret, Output};
use crate::config::Settings;
use crate::error::RecapError;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: Option<&std::path::Path>) -> anyhow::Result<()> {
    Output::header("Recap Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let sections = [
        ("Transcription", vec![check_tool(settings).await]),
        (
            "API Configuration",
            vec![
                check_api_key(
                    settings.summarization.api_key_from_env(),
                    &settings.summarization.api_key_env,
                ),
                check_endpoint(settings),
            ],
        ),
        ("Directories", vec![check_temp_dir(settings)]),
        ("Configuration", vec![check_config_file(config_path)]),
    ];

    let mut checks = Vec::new();
    for (title, results) in sections {
        println!("{}", style(title).bold());
        for check in &results {
            check.print();
        }
        println!();
        checks.extend(results);
    }

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Recap.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Recap is ready to use.");
    }

    Ok(())
}

/// Check if the transcription tool starts.
async fn check_tool(settings: &Settings) -> CheckResult {
    let command = settings.transcription.command.join(" ");
    match check_transcriber(&settings.transcription.command).await {
        Ok(()) => CheckResult::ok(&command, "available"),
        Err(RecapError::ToolNotFound(detail))
            if settings.transcription.command.first() == Some(&detail) =>
        {
            CheckResult::error(&command, "not found", install_hint_whisper())
        }
        Err(e) => CheckResult::error(&command, &e.to_string(), install_hint_whisper()),
    }
}

/// Check if the summarization API key is configured.
fn check_api_key(key: Option<String>, env_name: &str) -> CheckResult {
    let hint = format!("Set with: export {}='sk-or-...'", env_name);
    match key {
        Some(key) => CheckResult::ok(env_name, &format!("configured ({})", mask_secret(&key))),
        None => CheckResult::error(env_name, "not set", &hint),
    }
}

/// Check that the summarization endpoint is usable.
fn check_endpoint(settings: &Settings) -> CheckResult {
    match url::Url::parse(&settings.summarization.endpoint) {
        Ok(url) if url.scheme() == "https" => CheckResult::ok(
            "Endpoint",
            &format!("{} ({})", url, settings.summarization.model),
        ),
        Ok(url) => CheckResult::warning(
            "Endpoint",
            &format!("{} is not HTTPS", url),
            "The API key is sent in clear text",
        ),
        Err(e) => CheckResult::error(
            "Endpoint",
            &format!("invalid URL: {}", e),
            "Fix summarization.endpoint in the config file",
        ),
    }
}

/// Check that temporary directories can be created.
fn check_temp_dir(settings: &Settings) -> CheckResult {
    let root = settings.temp_dir();
    if let Err(e) = std::fs::create_dir_all(&root) {
        return CheckResult::error(
            "Temp directory",
            &format!("{} ({})", root.display(), e),
            "Set general.temp_dir to a writable directory",
        );
    }

    match tempfile::tempdir_in(&root) {
        Ok(_) => CheckResult::ok("Temp directory", &format!("{}", root.display())),
        Err(e) => CheckResult::error(
            "Temp directory",
            &format!("{} is not writable ({})", root.display(), e),
            "Set general.temp_dir to a writable directory",
        ),
    }
}

/// Check if config file exists.
fn check_config_file(config_path: Option<&std::path::Path>) -> CheckResult {
    let config_path = config_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(Settings::default_config_path);
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: recap config init",
        )
    }
}

/// Platform-specific install hint for the whisper CLI.
fn install_hint_whisper() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install openai-whisper (or pip install openai-whisper)"
    } else {
        "Install with: pip install openai-whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_api_key() {
        let missing = check_api_key(None, "OPENROUTER_API_KEY");
        assert_eq!(missing.status, CheckStatus::Error);

        let present = check_api_key(Some("sk-or-v1-0123456789abcdef".into()), "OPENROUTER_API_KEY");
        assert_eq!(present.status, CheckStatus::Ok);
        assert!(!present.message.contains("0123456789ab"));
    }

    #[test]
    fn test_check_endpoint() {
        let mut settings = Settings::default();
        assert_eq!(check_endpoint(&settings).status, CheckStatus::Ok);

        settings.summarization.endpoint = "http://localhost:11434/v1/chat/completions".into();
        assert_eq!(check_endpoint(&settings).status, CheckStatus::Warning);

        settings.summarization.endpoint = "::".into();
        assert_eq!(check_endpoint(&settings).status, CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_check_missing_tool() {
        let mut settings = Settings::default();
        settings.transcription.command = vec!["recap-test-no-such-transcriber".into()];
        let result = check_tool(&settings).await;
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.message, "not found");
    }

    #[test]
    fn test_check_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.temp_dir = dir.path().join("work").to_string_lossy().into_owned();
        assert_eq!(check_temp_dir(&settings).status, CheckStatus::Ok);
        assert!(dir.path().join("work").is_dir());
    }
}
