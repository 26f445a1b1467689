//! Pull command handler.
//!
//! Downloads a prompt from the hub and writes it as an unvalidated YAML
//! draft to start editing from.

use super::print_hints;
use chrono::Utc;
use clap::Args;
use promptsync_core::{config::AppConfig, AppError, AppResult};
use promptsync_prompt::{save_raw_prompt, RawPrompt};
use promptsync_registry::{create_client, PromptId, RegistryClient};
use std::path::PathBuf;

/// Value written to `metadata.source` of pulled drafts.
const DRAFT_SOURCE: &str = "langsmith_hub";

/// Pull a prompt from the hub into a local YAML draft
#[derive(Args, Debug)]
pub struct PullCommand {
    /// Prompt to pull as `owner/name` (default: configured source prompt)
    #[arg(long)]
    pub prompt_id: Option<String>,

    /// Output file (default: prompts/raw_prompts.yml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl PullCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing pull command");
        tracing::debug!("Pull options: {:?}", self);

        let credentials = config.credentials(false)?;
        let id = self.prompt_id(config)?;

        let client = create_client(&config.endpoint, &config.web_url, &credentials.api_key)
            .map_err(AppError::Config)?;

        let result = self.run(config, &id, client.as_ref()).await;

        if let Err(ref e) = result {
            print_hints(
                e,
                &[
                    "LANGSMITH_API_KEY in .env is correct".to_string(),
                    format!("the prompt '{}' exists on the hub", id),
                    "you have permission to read this prompt".to_string(),
                ],
            );
        }

        result.map(|_| ())
    }

    /// Fetch `id` through `client` and write the draft. Returns the written path.
    async fn run(
        &self,
        config: &AppConfig,
        id: &PromptId,
        client: &dyn RegistryClient,
    ) -> AppResult<PathBuf> {
        println!("Pulling prompt: {}", id);

        let record = client.fetch(id).await?;
        tracing::debug!(
            "Fetched {} from {} ({} input variable(s))",
            id,
            client.registry_name(),
            record.input_variables.len()
        );

        let raw = RawPrompt::from_template(id, record, DRAFT_SOURCE, Utc::now());

        let output = self.output.as_deref().unwrap_or(&config.pull_output);
        let path = config.resolve_path(output);
        save_raw_prompt(&raw, &path)?;

        println!("Saved draft to {}", path.display());
        Ok(path)
    }

    fn prompt_id(&self, config: &AppConfig) -> AppResult<PromptId> {
        self.prompt_id
            .as_deref()
            .unwrap_or(&config.source_prompt)
            .parse()
    }
}
