//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use console::style;
use std::process::Command;

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
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("TubeQA Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    let tool_check = check_ytdlp(&settings.captions.ytdlp_path);
    tool_check.print();
    checks.push(tool_check);

    println!();

    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref());
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![check_config_file(), check_prompts(settings)];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);
    Output::kv("Embedding model", &settings.embedding.model);
    Output::kv("Answer model", &settings.generation.model);
    Output::kv("Fallback language", &settings.captions.fallback_language);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using TubeQA.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! TubeQA is ready to use.");
    }

    Ok(())
}

/// Check that yt-dlp runs.
fn check_ytdlp(path: &str) -> CheckResult {
    let program = Settings::expand_path(path);

    match Command::new(&program).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();
            CheckResult::ok("yt-dlp", &version)
        }
        Ok(_) => CheckResult::error("yt-dlp", "installed but not working", install_hint_ytdlp()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error("yt-dlp", &format!("{} not found", path), install_hint_ytdlp())
        }
        Err(e) => CheckResult::error("yt-dlp", &format!("error: {}", e), install_hint_ytdlp()),
    }
}

/// Check the OpenAI API key.
fn check_openai_api_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Some(key) if key.trim().is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...' or add it to .env",
        ),
        Some(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        None => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...' or add it to .env",
        ),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: tubeqa config init",
        )
    }
}

/// Check that custom prompts, if configured, load.
fn check_prompts(settings: &Settings) -> CheckResult {
    let Some(dir) = settings.prompts.custom_dir.as_deref() else {
        return CheckResult::ok("Prompts", "built-in answer template");
    };

    match Prompts::load(Some(dir), Some(&settings.prompts.variables)) {
        Ok(prompts) if prompts.answer.template.contains("{{context}}") => {
            CheckResult::ok("Prompts", &format!("loaded from {}", dir))
        }
        Ok(_) => CheckResult::warning(
            "Prompts",
            "answer template has no {{context}} placeholder",
            "Answers will not be grounded in the transcript",
        ),
        Err(e) => CheckResult::error(
            "Prompts",
            &format!("failed to load: {}", e),
            "Check answer.toml in the custom prompts directory",
        ),
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_api_key_checks() {
        let ok = check_openai_api_key(Some("sk-proj-abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert!(!ok.message.contains("abcdefghijklmnop"));

        assert_eq!(check_openai_api_key(None).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("")).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("abc")).status, CheckStatus::Warning);
    }

    #[test]
    fn test_missing_ytdlp() {
        let result = check_ytdlp("/nonexistent/tubeqa-yt-dlp");
        assert_eq!(result.status, CheckStatus::Error);
    }

    #[test]
    fn test_default_prompts_ok() {
        assert_eq!(check_prompts(&Settings::default()).status, CheckStatus::Ok);
    }
}
