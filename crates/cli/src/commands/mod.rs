//! Command handlers for the promptsync CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod pull;
pub mod push;
pub mod validate;

// Re-export command types for convenience
pub use pull::PullCommand;
pub use push::PushCommand;
pub use validate::ValidateCommand;

use promptsync_core::{config::AppConfig, AppError, AppResult};
use promptsync_prompt::{resolve_rules, RuleSet};
use std::path::Path;

/// Resolve the validator rule set, letting command flags override config.
pub(crate) fn load_rule_set(
    config: &AppConfig,
    locale: Option<&str>,
    rules_file: Option<&Path>,
) -> AppResult<RuleSet> {
    let locale = locale.unwrap_or(&config.locale);
    let rules_file = rules_file
        .or(config.rules_file.as_deref())
        .map(|path| config.resolve_path(path));

    resolve_rules(locale, rules_file.as_deref())
}

/// Print remediation hints after a registry failure.
pub(crate) fn print_hints(error: &AppError, hints: &[String]) {
    if !error.is_remote() {
        return;
    }

    eprintln!("\nCheck that:");
    for (i, hint) in hints.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, hint);
    }
}
