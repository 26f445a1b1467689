//! Validator rule data.
//!
//! Indicator phrases, the technique whitelist and thresholds live here as
//! plain data so the quality bar can change without touching the rule
//! engine. A rule file only needs the keys it overrides:
//!
//! ```yaml
//! minExamples: 3
//! roleIndicators: ["you are", "act as"]
//! ```

use promptsync_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Markers that indicate unfinished prompt text. Compared upper-cased.
const PLACEHOLDER_MARKERS: &[&str] = &["[TODO]", "[ TODO ]", "TODO:", "# TODO", "// TODO", "/* TODO"];

/// Recognized prompting techniques. Compared after normalization.
const KNOWN_TECHNIQUES: &[&str] = &[
    "few_shot",
    "few-shot",
    "chain_of_thought",
    "chain-of-thought",
    "cot",
    "tree_of_thought",
    "skeleton_of_thought",
    "react",
    "role_prompting",
    "role-prompting",
    "rubric_based",
    "output_format",
    "complexity_classification",
];

/// Indicator sets and thresholds evaluated by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    /// Phrases that establish a role or persona in the system prompt
    pub role_indicators: Vec<String>,

    /// Phrases that ask for a specific output format or structure
    pub format_indicators: Vec<String>,

    /// Phrases that signal embedded few-shot examples
    pub example_indicators: Vec<String>,

    /// Word counted to estimate the number of examples
    pub example_token: String,

    pub min_examples: usize,

    pub placeholder_markers: Vec<String>,

    pub min_techniques: usize,

    pub known_techniques: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::english()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RuleSet {
    /// English indicator sets.
    pub fn english() -> Self {
        Self {
            role_indicators: strings(&[
                "you are",
                "act as",
                "your role",
                "# role",
                "## role",
                "role:",
                "persona:",
            ]),
            format_indicators: strings(&[
                "user story",
                "user-story",
                "acceptance criteria",
                "as a",
                "i want",
                "so that",
                "given",
                "when",
                "then",
                "markdown",
                "format",
                "structure",
            ]),
            example_indicators: strings(&[
                "example",
                "## example",
                "### example",
                "bug:",
                "---",
                "input:",
                "output:",
            ]),
            example_token: "example".to_string(),
            min_examples: 2,
            placeholder_markers: strings(PLACEHOLDER_MARKERS),
            min_techniques: 2,
            known_techniques: strings(KNOWN_TECHNIQUES),
        }
    }

    /// Brazilian Portuguese indicator sets.
    pub fn portuguese() -> Self {
        Self {
            role_indicators: strings(&[
                "você é",
                "voce é",
                "você é um",
                "voce é um",
                "atue como",
                "seu papel",
                "sua função",
                "# PAPEL",
                "## PAPEL",
                "role:",
                "persona:",
            ]),
            format_indicators: strings(&[
                "user story",
                "user-story",
                "como um",
                "como o",
                "eu quero",
                "para que",
                "critérios de aceitação",
                "dado que",
                "quando",
                "então",
                "markdown",
                "formato",
                "estrutura",
            ]),
            example_indicators: strings(&[
                "exemplo",
                "example",
                "## exemplo",
                "### exemplo",
                "bug:",
                "---",
                "entrada:",
                "saída:",
            ]),
            example_token: "exemplo".to_string(),
            ..Self::english()
        }
    }

    /// Preset for a locale tag ("en", "pt", "pt-BR", ...).
    pub fn from_locale(locale: &str) -> AppResult<Self> {
        match locale.to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Self::english()),
            "pt" | "pt-br" | "pt_br" | "portuguese" => Ok(Self::portuguese()),
            other => Err(AppError::Config(format!(
                "Unknown validation locale: {}. Supported: en, pt",
                other
            ))),
        }
    }
}

/// Load a rule set from a YAML file. Omitted keys keep the English defaults.
pub fn load_rules(path: &Path) -> AppResult<RuleSet> {
    tracing::debug!("Loading validation rules from: {:?}", path);

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read rules file {:?}: {}", path, e))
    })?;

    let rules: RuleSet = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Config(format!("Failed to parse rules file {:?}: {}", path, e))
    })?;

    reject_blank_entries(&rules).map_err(|key| {
        AppError::Config(format!(
            "Rules file {:?}: '{}' contains an empty entry, which would match any text",
            path, key
        ))
    })?;

    Ok(rules)
}

/// Name the first substring-matched list holding a blank entry.
fn reject_blank_entries(rules: &RuleSet) -> Result<(), &'static str> {
    let lists = [
        ("roleIndicators", &rules.role_indicators),
        ("formatIndicators", &rules.format_indicators),
        ("exampleIndicators", &rules.example_indicators),
        ("placeholderMarkers", &rules.placeholder_markers),
    ];

    match lists
        .iter()
        .find(|(_, entries)| entries.iter().any(|e| e.trim().is_empty()))
    {
        Some((key, _)) => Err(*key),
        None => Ok(()),
    }
}

/// Pick the rule set: an explicit rules file wins over the locale preset.
pub fn resolve_rules(locale: &str, rules_file: Option<&Path>) -> AppResult<RuleSet> {
    match rules_file {
        Some(path) => load_rules(path),
        None => RuleSet::from_locale(locale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_english() {
        let rules = RuleSet::default();
        assert_eq!(rules, RuleSet::english());
        assert_eq!(rules.example_token, "example");
        assert_eq!(rules.min_examples, 2);
        assert_eq!(rules.min_techniques, 2);
    }

    #[test]
    fn test_portuguese_shares_markers_and_whitelist() {
        let pt = RuleSet::portuguese();
        let en = RuleSet::english();
        assert_eq!(pt.example_token, "exemplo");
        assert_eq!(pt.placeholder_markers, en.placeholder_markers);
        assert_eq!(pt.known_techniques, en.known_techniques);
        assert!(pt.role_indicators.contains(&"atue como".to_string()));
    }

    #[test]
    fn test_from_locale() {
        assert_eq!(RuleSet::from_locale("pt-BR").unwrap(), RuleSet::portuguese());
        assert_eq!(RuleSet::from_locale("EN").unwrap(), RuleSet::english());
        assert!(RuleSet::from_locale("klingon").is_err());
    }

    #[test]
    fn test_partial_rules_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(
            &path,
            "minExamples: 3\nroleIndicators: [\"you are\"]\n",
        )
        .unwrap();

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.min_examples, 3);
        assert_eq!(rules.role_indicators, vec!["you are".to_string()]);
        assert_eq!(rules.known_techniques, RuleSet::english().known_techniques);
    }

    #[test]
    fn test_blank_indicator_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, "roleIndicators: [\"you are\", \"\"]\n").unwrap();

        let err = load_rules(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("'roleIndicators' contains an empty entry"));

        std::fs::write(&path, "placeholderMarkers: [\"  \"]\n").unwrap();
        assert!(load_rules(&path).is_err());
    }

    #[test]
    fn test_resolve_rules_prefers_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, "minTechniques: 1\n").unwrap();

        let rules = resolve_rules("pt", Some(&path)).unwrap();
        assert_eq!(rules.min_techniques, 1);
        assert_eq!(rules.example_token, "example");

        let rules = resolve_rules("pt", None).unwrap();
        assert_eq!(rules.example_token, "exemplo");
    }

    #[test]
    fn test_missing_rules_file() {
        let result = load_rules(Path::new("/no/such/rules.yaml"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
