//! Conversion between registry manifests and template types.
//!
//! The hub stores prompts as LangChain-serialized constructor objects:
//! `{"lc": 1, "type": "constructor", "id": [...], "kwargs": {...}}`.
//! Reading is lenient about the exact shape; writing always produces a
//! `ChatPromptTemplate` constructor.

use crate::types::{ChatTemplate, MessageRole, TemplateRecord};
use promptsync_core::{AppError, AppResult};
use serde_json::{json, Value};

/// Extract the template text and input variables from a manifest.
///
/// Accepted shapes:
/// - a chat template exposing a `messages` list (first message wins)
/// - a prompt template exposing `template`
/// - a plain string
pub fn extract_template(manifest: &Value) -> AppResult<TemplateRecord> {
    if let Value::String(text) = manifest {
        return Ok(TemplateRecord {
            template: text.clone(),
            input_variables: Vec::new(),
            commit_hash: None,
        });
    }

    let body = constructor_kwargs(manifest);

    let template = match body.get("messages").and_then(Value::as_array) {
        Some(messages) => {
            let first = messages.first().ok_or_else(|| {
                AppError::Registry("Prompt manifest has an empty message list".to_string())
            })?;
            find_template(first)
        }
        None => find_template(body),
    }
    .ok_or_else(|| {
        AppError::Registry(
            "Unrecognized prompt manifest: no messages, template or string found".to_string(),
        )
    })?;

    let input_variables = body
        .get("input_variables")
        .and_then(Value::as_array)
        .map(|vars| {
            vars.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(TemplateRecord {
        template,
        input_variables,
        commit_hash: None,
    })
}

/// Unwrap `kwargs` of a serialized constructor, or return the value itself.
fn constructor_kwargs(value: &Value) -> &Value {
    match value.get("kwargs") {
        Some(kwargs) if kwargs.is_object() => kwargs,
        _ => value,
    }
}

/// Find template text in a message or prompt object, descending through
/// `kwargs` and `prompt` wrappers.
fn find_template(value: &Value) -> Option<String> {
    if let Some(text) = value.as_str() {
        return Some(text.to_string());
    }

    let body = constructor_kwargs(value);

    if let Some(text) = body.get("template").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    body.get("prompt").and_then(find_template)
}

/// Serialize a chat template into a hub manifest.
pub fn to_manifest(template: &ChatTemplate) -> Value {
    let messages: Vec<Value> = template
        .messages
        .iter()
        .map(|message| {
            let class = match message.role {
                MessageRole::System => "SystemMessagePromptTemplate",
                MessageRole::Human => "HumanMessagePromptTemplate",
            };

            json!({
                "lc": 1,
                "type": "constructor",
                "id": ["langchain", "prompts", "chat", class],
                "kwargs": {
                    "prompt": {
                        "lc": 1,
                        "type": "constructor",
                        "id": ["langchain", "prompts", "prompt", "PromptTemplate"],
                        "kwargs": {
                            "input_variables": message.input_variables(),
                            "template": message.template,
                            "template_format": "f-string"
                        }
                    }
                }
            })
        })
        .collect();

    json!({
        "lc": 1,
        "type": "constructor",
        "id": ["langchain", "prompts", "chat", "ChatPromptTemplate"],
        "kwargs": {
            "input_variables": template.input_variables,
            "messages": messages
        }
    })
}
