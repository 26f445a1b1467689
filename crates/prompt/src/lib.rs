//! Prompt records for promptsync.
//!
//! This crate provides:
//! - The `PromptRecord` model read from hand-edited YAML files
//! - YAML loading and raw draft writing
//! - The content-quality rule engine (`RuleSet` + `validate`)
//! - Building the publication (template, tags, readme) for the registry

pub mod builder;
pub mod loader;
pub mod rules;
pub mod types;
pub mod validator;

// Re-export main types
pub use builder::{build_publication, merge_tags, render_readme, Publication};
pub use loader::{list_prompt_files, load_prompt_file, save_raw_prompt};
pub use rules::{load_rules, resolve_rules, RuleSet};
pub use types::{Field, FromYaml, ListItem, PromptRecord, RawPrompt, RawPromptMetadata};
pub use validator::{normalize_technique, validate, RuleKind, ValidationReport, Violation};
