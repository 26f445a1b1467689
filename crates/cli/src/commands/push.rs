//! Push command handler.
//!
//! Loads a local prompt, validates it and publishes it to the hub. Nothing is
//! sent unless validation passes.

use super::{load_rule_set, print_hints};
use clap::Args;
use promptsync_core::{config::AppConfig, AppError, AppResult};
use promptsync_prompt::{build_publication, load_prompt_file, validate, Publication};
use promptsync_registry::{create_client, RegistryClient};
use std::path::PathBuf;
use std::sync::Arc;

/// Namespace shown in dry runs when none is configured.
const DRY_RUN_NAMESPACE: &str = "local";

/// Validate a local prompt and publish it to the hub
#[derive(Args, Debug)]
pub struct PushCommand {
    /// Prompt file (default: prompts/bug_to_user_story_v2.yml)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Validate and show what would be published without contacting the hub
    #[arg(long)]
    pub dry_run: bool,
}

impl PushCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing push command");
        tracing::debug!("Push options: {:?}", self);

        if self.dry_run {
            let namespace = config.namespace.as_deref().unwrap_or(DRY_RUN_NAMESPACE);
            return self
                .run(config, namespace, || {
                    Err(AppError::Other("dry run never connects".to_string()))
                })
                .await
                .map(|_| ());
        }

        let credentials = config.credentials(true)?;
        let namespace = credentials.namespace.clone().unwrap_or_default();

        self.run(config, &namespace, || {
            create_client(&config.endpoint, &config.web_url, &credentials.api_key)
                .map_err(AppError::Config)
        })
        .await
        .map(|_| ())
    }

    /// Validate and publish. `connect` is only called once validation has
    /// passed and this is not a dry run.
    ///
    /// Returns the published URL, or `None` for a dry run.
    async fn run<F>(
        &self,
        config: &AppConfig,
        namespace: &str,
        connect: F,
    ) -> AppResult<Option<String>>
    where
        F: FnOnce() -> AppResult<Arc<dyn RegistryClient>>,
    {
        let file = self.file.as_deref().unwrap_or(&config.push_input);
        let path = config.resolve_path(file);

        let record = load_prompt_file(&path)?;

        println!("Prompt: {}", record.name);
        println!("Description: {}", record.description_text());
        println!(
            "Version: {}",
            record.version.as_ref().map(String::as_str).unwrap_or("-")
        );
        println!("Techniques: {}", record.techniques().len());

        let rules = load_rule_set(config, None, None)?;
        let report = validate(&record, &rules);

        if !report.is_valid() {
            eprintln!("\nValidation failed:");
            for violation in &report.violations {
                eprintln!("  - {}", violation);
            }
            return report.into_result().map(|_| None);
        }
        println!("Validation passed");

        let publication = build_publication(&record, namespace)?;

        if self.dry_run {
            print_dry_run(&publication);
            return Ok(None);
        }

        println!(
            "\nPublishing {} as a PUBLIC prompt; anyone can read it on the hub",
            publication.id
        );

        let client = connect()?;
        let result = client
            .publish(&publication.id, &publication.template, &publication.options)
            .await;

        match result {
            Ok(url) => {
                println!("Published: {}", url);
                Ok(Some(url))
            }
            Err(e) => {
                print_hints(
                    &e,
                    &[
                        "LANGSMITH_API_KEY in .env is correct".to_string(),
                        format!(
                            "USERNAME_LANGSMITH_HUB ('{}') matches your hub handle",
                            namespace
                        ),
                        "your API key has write permission".to_string(),
                    ],
                );
                Err(e)
            }
        }
    }
}

fn print_dry_run(publication: &Publication) {
    println!("\nDry run: nothing was sent");
    println!("Target: {}", publication.id);
    println!(
        "Input variables: {}",
        publication.template.input_variables.join(", ")
    );
    println!("Tags: {}", publication.options.tags.join(", "));
    println!("\n{}", publication.options.readme);
}
