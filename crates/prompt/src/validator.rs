//! Content-quality rule engine.
//!
//! [`validate`] is a pure function of a [`PromptRecord`] and a [`RuleSet`].
//! Every rule in [`RuleKind::ALL`] runs independently and all violations are
//! collected, so one pass reports everything an author has to fix.

use crate::rules::RuleSet;
use crate::types::{Field, ListItem, PromptRecord};
use promptsync_core::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    SystemPromptPresent,
    UserPromptPresent,
    RoleDefinition,
    OutputFormat,
    FewShotExamples,
    NoPlaceholders,
    TechniqueCount,
    TechniqueValidity,
}

impl RuleKind {
    /// Every rule, in evaluation order.
    pub const ALL: [RuleKind; 8] = [
        RuleKind::SystemPromptPresent,
        RuleKind::UserPromptPresent,
        RuleKind::RoleDefinition,
        RuleKind::OutputFormat,
        RuleKind::FewShotExamples,
        RuleKind::NoPlaceholders,
        RuleKind::TechniqueCount,
        RuleKind::TechniqueValidity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::SystemPromptPresent => "system_prompt_present",
            RuleKind::UserPromptPresent => "user_prompt_present",
            RuleKind::RoleDefinition => "role_definition",
            RuleKind::OutputFormat => "output_format",
            RuleKind::FewShotExamples => "few_shot_examples",
            RuleKind::NoPlaceholders => "no_placeholders",
            RuleKind::TechniqueCount => "technique_count",
            RuleKind::TechniqueValidity => "technique_validity",
        }
    }

    /// Evaluate this rule, returning one message per violation found.
    fn check(self, record: &PromptRecord, rules: &RuleSet) -> Vec<String> {
        match self {
            RuleKind::SystemPromptPresent => {
                check_text_present(&record.system_prompt, "systemPrompt")
            }
            RuleKind::UserPromptPresent => check_text_present(&record.user_prompt, "userPrompt"),
            RuleKind::RoleDefinition => {
                let system = record.system_text().to_lowercase();
                if contains_any(&system, &rules.role_indicators) {
                    Vec::new()
                } else {
                    vec![format!(
                        "systemPrompt does not define a role or persona; add one of: {}",
                        rules.role_indicators.join(", ")
                    )]
                }
            }
            RuleKind::OutputFormat => {
                let full = format!("{} {}", record.system_text(), record.user_text()).to_lowercase();
                if contains_any(&full, &rules.format_indicators) {
                    Vec::new()
                } else {
                    vec![format!(
                        "Prompt does not specify an output format; mention one of: {}",
                        rules.format_indicators.join(", ")
                    )]
                }
            }
            RuleKind::FewShotExamples => {
                let system = record.system_text().to_lowercase();
                let mut violations = Vec::new();

                if !contains_any(&system, &rules.example_indicators) {
                    violations.push(
                        "systemPrompt contains no few-shot examples; add example input/output pairs"
                            .to_string(),
                    );
                }

                let count = count_occurrences(&system, &rules.example_token.to_lowercase());
                if count < rules.min_examples {
                    violations.push(format!(
                        "systemPrompt must contain at least {} few-shot examples (found {} occurrence(s) of '{}')",
                        rules.min_examples, count, rules.example_token
                    ));
                }

                violations
            }
            RuleKind::NoPlaceholders => {
                let full = format!(
                    "{} {} {}",
                    record.system_text(),
                    record.user_text(),
                    record.description_text()
                )
                .to_uppercase();

                rules
                    .placeholder_markers
                    .iter()
                    .filter(|marker| full.contains(&marker.to_uppercase()))
                    .map(|marker| {
                        format!("Placeholder '{}' found; remove it before publishing", marker)
                    })
                    .collect()
            }
            RuleKind::TechniqueCount => match &record.techniques_applied {
                Field::Missing => vec!["Field 'techniquesApplied' is missing".to_string()],
                Field::Invalid { found } => vec![format!(
                    "Field 'techniquesApplied' must be a list of technique names (found {})",
                    found
                )],
                Field::Present(techniques) if techniques.len() < rules.min_techniques => {
                    vec![format!(
                        "Field 'techniquesApplied' must list at least {} techniques (found {})",
                        rules.min_techniques,
                        techniques.len()
                    )]
                }
                Field::Present(_) => Vec::new(),
            },
            RuleKind::TechniqueValidity => {
                let known: Vec<String> = rules
                    .known_techniques
                    .iter()
                    .map(|t| normalize_technique(t))
                    .filter(|t| !t.is_empty())
                    .collect();

                let items = record.techniques_applied.as_ref().map(Vec::as_slice).unwrap_or(&[]);

                items
                    .iter()
                    .filter_map(|item| match item {
                        ListItem::Text(technique) => {
                            let normalized = normalize_technique(technique);
                            if known.iter().any(|k| normalized.contains(k.as_str())) {
                                None
                            } else {
                                Some(format!("Technique '{}'", technique))
                            }
                        }
                        ListItem::Other { found } => Some(format!("Technique entry of type {}", found)),
                    })
                    .map(|subject| {
                        format!(
                            "{} is not recognized; use one of: {}",
                            subject,
                            rules.known_techniques.join(", ")
                        )
                    })
                    .collect()
            }
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed rule with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: RuleKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of validating one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Name of the validated record
    pub prompt: String,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violation messages, in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    /// Convert into a result, failing with every message when invalid.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AppError::Validation(self.messages()))
        }
    }
}

/// Validate a record against every rule.
///
/// Never fails: missing or wrong-typed fields are reported as violations.
///
/// # Example
/// ```
/// use promptsync_prompt::{validate, PromptRecord, RuleSet};
///
/// let record = PromptRecord::new("story")
///     .with_system_prompt("You are a PM. ## Example 1 ... ## Example 2 ...")
///     .with_user_prompt("Write a user story in Markdown.")
///     .with_techniques(["few_shot", "role_prompting"]);
///
/// let report = validate(&record, &RuleSet::default());
/// assert!(report.is_valid());
/// ```
pub fn validate(record: &PromptRecord, rules: &RuleSet) -> ValidationReport {
    let violations = RuleKind::ALL
        .iter()
        .flat_map(|rule| {
            rule.check(record, rules)
                .into_iter()
                .map(move |message| Violation {
                    rule: *rule,
                    message,
                })
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Validated prompt '{}': {} violation(s)",
        record.name,
        violations.len()
    );

    ValidationReport {
        prompt: record.name.clone(),
        violations,
    }
}

/// Normalize a technique name: lower-case, with runs of spaces, hyphens and
/// underscores folded into a single `_`.
pub fn normalize_technique(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| c == ' ' || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn check_text_present(field: &Field<String>, key: &str) -> Vec<String> {
    match field {
        Field::Present(text) if !text.trim().is_empty() => Vec::new(),
        Field::Invalid { found } => {
            vec![format!("Field '{}' must be a string (found {})", key, found)]
        }
        _ => vec![format!("Field '{}' is missing or empty", key)],
    }
}

fn contains_any(haystack: &str, indicators: &[String]) -> bool {
    indicators
        .iter()
        .any(|indicator| haystack.contains(&indicator.to_lowercase()))
}

/// Count non-overlapping occurrences of `needle`.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
