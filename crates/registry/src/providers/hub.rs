//! LangSmith-compatible prompt hub client.
//!
//! Endpoints used:
//! - `GET  /commits/{owner}/{name}/latest` to read a prompt
//! - `GET  /repos/{owner}/{name}` to check whether a prompt exists
//! - `POST /repos/` or `PATCH /repos/{owner}/{name}` to write its metadata
//! - `POST /commits/{owner}/{name}` to commit a new manifest

use crate::client::RegistryClient;
use crate::manifest::{extract_template, to_manifest};
use crate::types::{ChatTemplate, PromptId, PublishOptions, TemplateRecord};
use promptsync_core::config::{DEFAULT_ENDPOINT, DEFAULT_WEB_URL};
use promptsync_core::{AppError, AppResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Hub response for a single commit.
#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    commit_hash: Option<String>,
    manifest: serde_json::Value,
}

/// Hub request to create a prompt repository.
#[derive(Debug, Serialize)]
struct CreateRepoRequest<'a> {
    repo_handle: &'a str,
    is_public: bool,
    description: &'a str,
    readme: &'a str,
    tags: &'a [String],
}

/// Hub request to update prompt repository metadata.
#[derive(Debug, Serialize)]
struct UpdateRepoRequest<'a> {
    is_public: bool,
    description: &'a str,
    readme: &'a str,
    tags: &'a [String],
}

#[derive(Debug, Serialize)]
struct CreateCommitRequest {
    manifest: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CreateCommitResponse {
    commit: CommitInfo,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    commit_hash: String,
}

/// Prompt hub client.
pub struct HubClient {
    /// Base URL for the hub API
    base_url: String,

    /// Base URL for links to published prompts
    web_url: String,

    /// API key sent as `x-api-key`
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HubClient {
    /// Create a hub client against the public LangSmith endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_ENDPOINT, DEFAULT_WEB_URL, api_key)
    }

    /// Create a hub client with custom API and web URLs.
    pub fn with_base_url(
        base_url: impl Into<String>,
        web_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            web_url: web_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Public link to a committed prompt.
    fn prompt_url(&self, id: &PromptId, commit_hash: &str) -> String {
        let short: String = commit_hash.chars().take(8).collect();
        format!("{}/hub/{}:{}", self.web_url, id, short)
    }

    /// Turn a non-success response into a registry error.
    async fn check(response: reqwest::Response, action: &str) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(AppError::Registry(format!(
            "Failed to {} ({}): {}",
            action, status, error_text
        )))
    }

    async fn repo_exists(&self, id: &PromptId) -> AppResult<bool> {
        let url = self.url(&format!("repos/{}/{}", id.owner(), id.name()));

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Registry(format!("Failed to reach prompt hub: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::check(response, "look up prompt").await?;
        Ok(true)
    }

    async fn upsert_repo(&self, id: &PromptId, options: &PublishOptions) -> AppResult<()> {
        let request = if self.repo_exists(id).await? {
            tracing::debug!("Updating metadata of existing prompt {}", id);
            self.client
                .patch(self.url(&format!("repos/{}/{}", id.owner(), id.name())))
                .json(&UpdateRepoRequest {
                    is_public: options.is_public,
                    description: &options.description,
                    readme: &options.readme,
                    tags: &options.tags,
                })
        } else {
            tracing::debug!("Creating prompt {}", id);
            self.client.post(self.url("repos/")).json(&CreateRepoRequest {
                repo_handle: id.name(),
                is_public: options.is_public,
                description: &options.description,
                readme: &options.readme,
                tags: &options.tags,
            })
        };

        let response = request
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Registry(format!("Failed to reach prompt hub: {}", e)))?;

        Self::check(response, "write prompt metadata").await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RegistryClient for HubClient {
    fn registry_name(&self) -> &str {
        "langsmith-hub"
    }

    async fn fetch(&self, id: &PromptId) -> AppResult<TemplateRecord> {
        tracing::info!("Pulling prompt {} from hub", id);

        let url = self.url(&format!("commits/{}/{}/latest", id.owner(), id.name()));

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Registry(format!("Failed to reach prompt hub: {}", e)))?;

        let response = Self::check(response, &format!("pull prompt '{}'", id)).await?;

        let commit: CommitResponse = response
            .json()
            .await
            .map_err(|e| AppError::Registry(format!("Failed to parse hub response: {}", e)))?;

        tracing::debug!("Manifest: {}", commit.manifest);

        let mut record = extract_template(&commit.manifest)?;
        record.commit_hash = commit.commit_hash;

        Ok(record)
    }

    async fn publish(
        &self,
        id: &PromptId,
        template: &ChatTemplate,
        options: &PublishOptions,
    ) -> AppResult<String> {
        tracing::info!("Publishing prompt {} to hub", id);

        self.upsert_repo(id, options).await?;

        let url = self.url(&format!("commits/{}/{}", id.owner(), id.name()));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&CreateCommitRequest {
                manifest: to_manifest(template),
            })
            .send()
            .await
            .map_err(|e| AppError::Registry(format!("Failed to reach prompt hub: {}", e)))?;

        let response = Self::check(response, &format!("commit prompt '{}'", id)).await?;

        let created: CreateCommitResponse = response
            .json()
            .await
            .map_err(|e| AppError::Registry(format!("Failed to parse hub response: {}", e)))?;

        tracing::info!("Committed {} as {}", id, created.commit.commit_hash);

        Ok(self.prompt_url(id, &created.commit.commit_hash))
    }
}
