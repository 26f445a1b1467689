//! Prompt types for promptsync.
//!
//! This module defines the domain entities read from and written to local
//! YAML files.

use chrono::{DateTime, Utc};
use promptsync_registry::{PromptId, TemplateRecord};
use serde::{Deserialize, Deserializer, Serialize};

/// A record field that may be absent or hold the wrong YAML type.
///
/// Loading never fails on a bad field; the validator reports it instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Key absent or explicitly null
    Missing,

    /// Key present with a value of the wrong type
    Invalid { found: &'static str },

    Present(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }
}

impl<'de, T: FromYaml> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_yaml::Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Field::Missing);
        }

        Ok(match T::from_yaml(value) {
            Ok(parsed) => Field::Present(parsed),
            Err(found) => Field::Invalid { found },
        })
    }
}

/// Conversion from a raw YAML value into a record field.
///
/// Returns the kind of the value found on a type mismatch.
pub trait FromYaml: Sized {
    fn from_yaml(value: serde_yaml::Value) -> Result<Self, &'static str>;
}

/// Strings, numbers and booleans read as text: `version: 3` is the label "3".
impl FromYaml for String {
    fn from_yaml(value: serde_yaml::Value) -> Result<Self, &'static str> {
        scalar_text(&value).ok_or_else(|| yaml_kind(&value))
    }
}

/// A list of text entries. Any nested entry makes the whole list invalid.
impl FromYaml for Vec<String> {
    fn from_yaml(value: serde_yaml::Value) -> Result<Self, &'static str> {
        match value {
            serde_yaml::Value::Sequence(items) => items
                .iter()
                .map(|item| scalar_text(item).ok_or("list with nested entries"))
                .collect(),
            other => Err(yaml_kind(&other)),
        }
    }
}

/// A list whose entries are kept one by one, so a bad entry does not hide
/// the rest of the list.
impl FromYaml for Vec<ListItem> {
    fn from_yaml(value: serde_yaml::Value) -> Result<Self, &'static str> {
        match value {
            serde_yaml::Value::Sequence(items) => Ok(items
                .iter()
                .map(|item| match scalar_text(item) {
                    Some(text) => ListItem::Text(text),
                    None => ListItem::Other {
                        found: yaml_kind(item),
                    },
                })
                .collect()),
            other => Err(yaml_kind(&other)),
        }
    }
}

/// One entry of a list field.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    /// A scalar entry, in its text form
    Text(String),

    /// A null, list or mapping entry
    Other { found: &'static str },
}

impl ListItem {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ListItem::Text(text) => Some(text),
            ListItem::Other { .. } => None,
        }
    }
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Human-readable name of a YAML value's type.
fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    use serde_yaml::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// A hand-edited prompt, stored under its name as the single top-level key
/// of a YAML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PromptRecord {
    /// Top-level key the record was stored under
    #[serde(skip)]
    pub name: String,

    /// Instruction block sent with the "system" role
    #[serde(rename = "systemPrompt", alias = "system_prompt", default)]
    pub system_prompt: Field<String>,

    /// Template sent with the "human" role
    #[serde(rename = "userPrompt", alias = "user_prompt", default)]
    pub user_prompt: Field<String>,

    #[serde(default)]
    pub description: Field<String>,

    /// Free-form version label (e.g. "v2")
    #[serde(default)]
    pub version: Field<String>,

    /// Prompting techniques declared by the author
    #[serde(rename = "techniquesApplied", alias = "techniques_applied", default)]
    pub techniques_applied: Field<Vec<ListItem>>,

    #[serde(default)]
    pub tags: Field<Vec<String>>,
}

impl PromptRecord {
    /// Create an empty record with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_system_prompt(mut self, text: impl Into<String>) -> Self {
        self.system_prompt = Field::Present(text.into());
        self
    }

    pub fn with_user_prompt(mut self, text: impl Into<String>) -> Self {
        self.user_prompt = Field::Present(text.into());
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Field::Present(text.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Field::Present(version.into());
        self
    }

    pub fn with_techniques<I, S>(mut self, techniques: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.techniques_applied = Field::Present(
            techniques
                .into_iter()
                .map(|t| ListItem::Text(t.into()))
                .collect(),
        );
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Field::Present(tags.into_iter().map(Into::into).collect());
        self
    }

    /// System prompt text, empty when absent.
    pub fn system_text(&self) -> &str {
        self.system_prompt.as_ref().map(String::as_str).unwrap_or("")
    }

    /// User prompt text, empty when absent.
    pub fn user_text(&self) -> &str {
        self.user_prompt.as_ref().map(String::as_str).unwrap_or("")
    }

    /// Description text, empty when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_ref().map(String::as_str).unwrap_or("")
    }

    /// Declared technique names, empty when absent or malformed.
    /// Non-text entries are skipped.
    pub fn techniques(&self) -> Vec<String> {
        self.techniques_applied
            .as_ref()
            .map(|items| {
                items
                    .iter()
                    .filter_map(ListItem::as_text)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Author tags, empty when absent or malformed.
    pub fn author_tags(&self) -> &[String] {
        self.tags.as_ref().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Unvalidated draft written by `pull`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrompt {
    #[serde(rename = "promptId")]
    pub prompt_id: String,

    #[serde(rename = "promptTemplate")]
    pub prompt_template: String,

    #[serde(rename = "inputVariables")]
    pub input_variables: Vec<String>,

    pub metadata: RawPromptMetadata,
}

/// Provenance of a pulled draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPromptMetadata {
    /// Where the draft came from (e.g. "langsmith_hub")
    pub source: String,

    #[serde(rename = "pulledAt")]
    pub pulled_at: DateTime<Utc>,

    /// Registry commit the draft was pulled from
    #[serde(rename = "commitHash", skip_serializing_if = "Option::is_none", default)]
    pub commit_hash: Option<String>,
}

impl RawPrompt {
    /// Build a draft from a fetched template.
    pub fn from_template(
        id: &PromptId,
        record: TemplateRecord,
        source: impl Into<String>,
        pulled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            prompt_id: id.to_string(),
            prompt_template: record.template,
            input_variables: record.input_variables,
            metadata: RawPromptMetadata {
                source: source.into(),
                pulled_at,
                commit_hash: record.commit_hash,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_record_deserialization() {
        let yaml = r#"
systemPrompt: "You are a Product Manager."
userPrompt: "Bug: {bug_report}"
description: "Turns bugs into stories"
version: v2
techniquesApplied: [few_shot, role_prompting]
tags: [product]
"#;

        let record: PromptRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.system_text(), "You are a Product Manager.");
        assert_eq!(record.version, Field::Present("v2".to_string()));
        assert_eq!(record.techniques().len(), 2);
        assert_eq!(record.author_tags(), ["product".to_string()]);
    }

    #[test]
    fn test_snake_case_keys_are_accepted() {
        let yaml = r#"
system_prompt: "You are a tester."
user_prompt: "Go"
techniques_applied:
  - few_shot
"#;

        let record: PromptRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.system_text(), "You are a tester.");
        assert_eq!(record.user_text(), "Go");
        assert_eq!(record.techniques(), ["few_shot".to_string()]);
    }

    #[test]
    fn test_missing_null_and_wrong_typed_fields() {
        let yaml = r#"
systemPrompt: ~
userPrompt: [a, b]
techniquesApplied: "few_shot"
"#;

        let record: PromptRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.system_prompt, Field::Missing);
        assert_eq!(record.user_prompt, Field::Invalid { found: "list" });
        assert_eq!(record.techniques_applied, Field::Invalid { found: "string" });
        assert_eq!(record.description, Field::Missing);
        assert!(record.techniques().is_empty());
    }

    #[test]
    fn test_scalars_read_as_text() {
        let yaml = r#"
version: 3
description: true
tags: [product, 2024]
"#;

        let record: PromptRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.version, Field::Present("3".to_string()));
        assert_eq!(record.description_text(), "true");
        assert_eq!(record.author_tags(), ["product".to_string(), "2024".to_string()]);
    }

    #[test]
    fn test_list_entries_are_kept_individually() {
        let yaml = r#"
techniquesApplied: [few_shot, 42, {name: cot}]
tags: [product, [nested]]
"#;

        let record: PromptRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            record.techniques_applied,
            Field::Present(vec![
                ListItem::Text("few_shot".to_string()),
                ListItem::Text("42".to_string()),
                ListItem::Other { found: "mapping" },
            ])
        );
        assert_eq!(record.techniques(), ["few_shot".to_string(), "42".to_string()]);
        assert_eq!(
            record.tags,
            Field::Invalid {
                found: "list with nested entries"
            }
        );
    }

    #[test]
    fn test_duplicate_spellings_are_rejected() {
        let yaml = "systemPrompt: a\nsystem_prompt: b\n";
        let err = serde_yaml::from_str::<PromptRecord>(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn test_raw_prompt_serializes_camel_case() {
        let id: PromptId = "leonanluppi/bug_to_user_story_v1".parse().unwrap();
        let pulled_at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let raw = RawPrompt::from_template(
            &id,
            TemplateRecord {
                template: "Bug: {bug_report}".to_string(),
                input_variables: vec!["bug_report".to_string()],
                commit_hash: None,
            },
            "langsmith_hub",
            pulled_at,
        );

        let yaml = serde_yaml::to_string(&raw).unwrap();
        assert!(yaml.contains("promptId: leonanluppi/bug_to_user_story_v1"));
        assert!(yaml.contains("inputVariables:"));
        assert!(yaml.contains("source: langsmith_hub"));
        assert!(yaml.contains("pulledAt:"));
        assert!(!yaml.contains("commitHash"));
    }
}
