//! Publication builder: turns a validated record into the template, tags
//! and readme sent to the registry.

use crate::types::PromptRecord;
use handlebars::Handlebars;
use promptsync_core::{AppError, AppResult};
use promptsync_registry::{ChatMessage, ChatTemplate, PromptId, PublishOptions};

/// Version label used in the readme when the record has none.
pub const DEFAULT_VERSION: &str = "v2";

const README_TEMPLATE: &str = "# {{name}}

{{description}}

## Techniques Applied{{#each techniques}}
- {{this}}{{/each}}

## Version
{{version}}
";

/// Everything needed for one registry publish call.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub id: PromptId,
    pub template: ChatTemplate,
    pub options: PublishOptions,
}

/// Build the publication for `record` under `namespace`.
///
/// The record is expected to have passed validation; missing prompt text is
/// still rejected here rather than published empty.
pub fn build_publication(record: &PromptRecord, namespace: &str) -> AppResult<Publication> {
    let id = PromptId::new(namespace, record.name.as_str())?;

    let system = record.system_prompt.as_ref().ok_or_else(|| {
        AppError::Prompt(format!("Prompt '{}' has no systemPrompt", record.name))
    })?;
    let user = record.user_prompt.as_ref().ok_or_else(|| {
        AppError::Prompt(format!("Prompt '{}' has no userPrompt", record.name))
    })?;

    let template = ChatTemplate::from_messages(vec![
        ChatMessage::system(system.as_str()),
        ChatMessage::human(user.as_str()),
    ]);

    tracing::debug!(
        "Built template for {} with variables {:?}",
        id,
        template.input_variables
    );

    let options = PublishOptions {
        is_public: true,
        description: record.description_text().to_string(),
        readme: render_readme(record)?,
        tags: merge_tags(record.author_tags(), &record.techniques()),
    };

    Ok(Publication {
        id,
        template,
        options,
    })
}

/// Author tags followed by `technique:<slug>` tags, without duplicates.
pub fn merge_tags(author_tags: &[String], techniques: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(author_tags.len() + techniques.len());

    let technique_tags = techniques.iter().map(|t| technique_tag(t));
    for tag in author_tags.iter().cloned().chain(technique_tags) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    tags
}

/// Registry tag for a technique, e.g. `Chain of Thought` -> `technique:chain-of-thought`.
fn technique_tag(technique: &str) -> String {
    format!("technique:{}", technique.trim().to_lowercase().replace(' ', "-"))
}

/// Render the readme shown on the registry page.
pub fn render_readme(record: &PromptRecord) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("readme", README_TEMPLATE)
        .map_err(|e| AppError::Prompt(format!("Failed to register readme template: {}", e)))?;

    let data = serde_json::json!({
        "name": record.name,
        "description": record.description_text(),
        "techniques": record.techniques(),
        "version": record.version.as_ref().map(String::as_str).unwrap_or(DEFAULT_VERSION),
    });

    handlebars
        .render("readme", &data)
        .map_err(|e| AppError::Prompt(format!("Failed to render readme: {}", e)))
}
