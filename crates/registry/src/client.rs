//! Registry client abstraction.
//!
//! The pull and push flows only ever see this trait, never a concrete
//! HTTP client.

use crate::types::{ChatTemplate, PromptId, PublishOptions, TemplateRecord};
use promptsync_core::AppResult;

/// Capability interface of a prompt registry.
#[async_trait::async_trait]
pub trait RegistryClient: Send + Sync {
    /// Get the registry name (e.g., "langsmith-hub", "mock").
    fn registry_name(&self) -> &str;

    /// Read the latest version of a prompt.
    ///
    /// # Arguments
    /// * `id` - Prompt identifier (`owner/name`)
    ///
    /// # Returns
    /// The extracted template text and declared input variables
    async fn fetch(&self, id: &PromptId) -> AppResult<TemplateRecord>;

    /// Publish a chat template under `id`, creating the entry if needed.
    ///
    /// # Arguments
    /// * `id` - Target identifier (`namespace/name`)
    /// * `template` - System/human message pair to commit
    /// * `options` - Visibility, description, readme and tags
    ///
    /// # Returns
    /// The URL of the published prompt
    async fn publish(
        &self,
        id: &PromptId,
        template: &ChatTemplate,
        options: &PublishOptions,
    ) -> AppResult<String>;
}
