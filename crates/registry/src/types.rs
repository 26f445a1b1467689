//! Registry request and response types.

use promptsync_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registry identifier of a prompt, written `<owner>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptId {
    owner: String,
    name: String,
}

impl PromptId {
    /// Build an identifier from its two parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> AppResult<Self> {
        let owner = owner.into();
        let name = name.into();

        if owner.trim().is_empty() || name.trim().is_empty() {
            return Err(AppError::Config(format!(
                "Invalid prompt identifier '{}/{}': owner and name must be non-empty",
                owner, name
            )));
        }

        if owner.contains('/') || name.contains('/') {
            return Err(AppError::Config(format!(
                "Invalid prompt identifier '{}/{}': expected exactly one '/'",
                owner, name
            )));
        }

        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for PromptId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s.split_once('/').ok_or_else(|| {
            AppError::Config(format!(
                "Invalid prompt identifier '{}': expected '<owner>/<name>'",
                s
            ))
        })?;
        Self::new(owner, name)
    }
}

impl TryFrom<String> for PromptId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PromptId> for String {
    fn from(id: PromptId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A prompt template as read back from the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Template text of the first message (or the whole prompt)
    pub template: String,

    /// Declared input variable names
    #[serde(default)]
    pub input_variables: Vec<String>,

    /// Commit the template was read from, when the registry reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
}

/// Role of a message inside a chat template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    Human,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::Human => "human",
        }
    }
}

/// One message template of a chat prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub template: String,
}

impl ChatMessage {
    pub fn system(template: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            template: template.into(),
        }
    }

    pub fn human(template: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Human,
            template: template.into(),
        }
    }

    /// Variables referenced by this message.
    pub fn input_variables(&self) -> Vec<String> {
        extract_variables(&self.template)
    }
}

/// A rendered chat template ready to be published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTemplate {
    pub messages: Vec<ChatMessage>,

    /// Union of the variables referenced by all messages, in first-seen order
    pub input_variables: Vec<String>,
}

impl ChatTemplate {
    /// Build a template from messages, collecting their input variables.
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        let mut input_variables: Vec<String> = Vec::new();
        for message in &messages {
            for var in message.input_variables() {
                if !input_variables.contains(&var) {
                    input_variables.push(var);
                }
            }
        }

        Self {
            messages,
            input_variables,
        }
    }
}

/// Metadata sent alongside a published template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishOptions {
    pub is_public: bool,
    pub description: String,
    pub readme: String,
    pub tags: Vec<String>,
}

/// Extract `{variable}` names from an f-string style template.
///
/// `{{` and `}}` are literal braces. Unterminated or empty braces are ignored.
pub fn extract_variables(template: &str) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    name.push(inner);
                }

                let name = name.trim();
                if closed && is_identifier(name) && !vars.iter().any(|v| v == name) {
                    vars.push(name.to_string());
                }
            }
            _ => {}
        }
    }

    vars
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_id_parse_and_display() {
        let id: PromptId = "leonanluppi/bug_to_user_story_v1".parse().unwrap();
        assert_eq!(id.owner(), "leonanluppi");
        assert_eq!(id.name(), "bug_to_user_story_v1");
        assert_eq!(id.to_string(), "leonanluppi/bug_to_user_story_v1");
    }

    #[test]
    fn test_prompt_id_rejects_bad_shapes() {
        assert!("no_slash".parse::<PromptId>().is_err());
        assert!("/name".parse::<PromptId>().is_err());
        assert!("owner/".parse::<PromptId>().is_err());
        assert!("a/b/c".parse::<PromptId>().is_err());
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("Bug: {bug_report}\nContext: { context } and {bug_report}");
        assert_eq!(vars, vec!["bug_report".to_string(), "context".to_string()]);
    }

    #[test]
    fn test_extract_variables_skips_escaped_and_json() {
        let vars = extract_variables(r#"Return {{"title": "..."}} for {input}"#);
        assert_eq!(vars, vec!["input".to_string()]);
    }

    #[test]
    fn test_extract_variables_ignores_unterminated() {
        assert!(extract_variables("oops {unterminated").is_empty());
        assert!(extract_variables("empty {} braces").is_empty());
    }

    #[test]
    fn test_chat_template_collects_variables_in_order() {
        let template = ChatTemplate::from_messages(vec![
            ChatMessage::system("You are {persona}."),
            ChatMessage::human("Bug: {bug_report} ({persona})"),
        ]);
        assert_eq!(
            template.input_variables,
            vec!["persona".to_string(), "bug_report".to_string()]
        );
    }
}
