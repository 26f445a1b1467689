//! Validate command handler.

use super::load_rule_set;
use clap::Args;
use promptsync_core::{config::AppConfig, AppError, AppResult};
use promptsync_prompt::{list_prompt_files, load_prompt_file, validate, ValidationReport};
use std::path::{Path, PathBuf};

/// Check local prompt files against the quality rules
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Prompt files or directories (default: prompts/bug_to_user_story_v2.yml)
    pub paths: Vec<PathBuf>,

    /// YAML file overriding the rule data
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Indicator locale (en, pt)
    #[arg(long)]
    pub locale: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result for one file: a report, or the reason it could not be loaded.
#[derive(Debug)]
struct FileResult {
    path: PathBuf,
    outcome: Result<ValidationReport, String>,
}

impl FileResult {
    fn passed(&self) -> bool {
        matches!(&self.outcome, Ok(report) if report.is_valid())
    }

    fn failures(&self) -> Vec<String> {
        match &self.outcome {
            Ok(report) => report.messages(),
            Err(e) => vec![e.clone()],
        }
    }
}

impl ValidateCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing validate command");
        tracing::debug!("Validate options: {:?}", self);

        let rules = load_rule_set(config, self.locale.as_deref(), self.rules.as_deref())?;
        let files = self.collect_files(config)?;

        if files.is_empty() {
            return Err(AppError::Prompt("No prompt files found".to_string()));
        }

        let results: Vec<FileResult> = files
            .into_iter()
            .map(|path| {
                let outcome = load_prompt_file(&path)
                    .map(|record| validate(&record, &rules))
                    .map_err(|e| e.to_string());
                FileResult { path, outcome }
            })
            .collect();

        if self.json {
            print_json(&results)?;
        } else {
            print_text(&results);
        }

        let failures: Vec<String> = results
            .iter()
            .flat_map(|r| {
                let path = r.path.display().to_string();
                r.failures()
                    .into_iter()
                    .map(move |message| format!("{}: {}", path, message))
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(failures))
        }
    }

    /// Expand directories into the prompt files they contain.
    fn collect_files(&self, config: &AppConfig) -> AppResult<Vec<PathBuf>> {
        let inputs: Vec<PathBuf> = if self.paths.is_empty() {
            vec![config.resolve_path(&config.push_input)]
        } else {
            self.paths.iter().map(|p| config.resolve_path(p)).collect()
        };

        let mut files = Vec::new();
        for input in inputs {
            if input.is_dir() {
                files.extend(list_prompt_files(&input)?);
            } else {
                files.push(input);
            }
        }

        Ok(files)
    }
}

fn print_text(results: &[FileResult]) {
    for result in results {
        let label = display_name(&result.path);
        match &result.outcome {
            Ok(report) if report.is_valid() => {
                println!("✓ {} ({})", report.prompt, label);
            }
            Ok(report) => {
                println!("✗ {} ({})", report.prompt, label);
                for violation in &report.violations {
                    println!("    - [{}] {}", violation.rule, violation.message);
                }
            }
            Err(e) => {
                println!("✗ {}", label);
                println!("    - {}", e);
            }
        }
    }

    let passed = results.iter().filter(|r| r.passed()).count();
    println!("\n{}/{} prompt file(s) passed", passed, results.len());
}

fn print_json(results: &[FileResult]) -> AppResult<()> {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|result| match &result.outcome {
            Ok(report) => serde_json::json!({
                "file": result.path,
                "prompt": report.prompt,
                "valid": report.is_valid(),
                "violations": report.violations,
            }),
            Err(e) => serde_json::json!({
                "file": result.path,
                "valid": false,
                "error": e,
            }),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
