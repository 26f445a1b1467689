//! In-memory registry for tests and dry runs.

use crate::client::RegistryClient;
use crate::types::{ChatTemplate, PromptId, PublishOptions, TemplateRecord};
use promptsync_core::{AppError, AppResult};
use std::sync::Mutex;

/// A call received by [`MockRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Fetch(PromptId),
    Publish {
        id: PromptId,
        template: ChatTemplate,
        options: PublishOptions,
    },
}

/// Mock registry that never touches the network.
///
/// Every call is recorded, so tests can assert both what was sent and that
/// nothing was sent at all.
#[derive(Debug, Default)]
pub struct MockRegistry {
    template: Option<TemplateRecord>,
    failure: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRegistry {
    /// Create an empty mock; `fetch` reports every prompt as not found.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `template` for every `fetch`.
    pub fn with_template(mut self, template: TemplateRecord) -> Self {
        self.template = Some(template);
        self
    }

    /// Fail every call with a registry error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check_failure(&self) -> AppResult<()> {
        match self.failure {
            Some(ref message) => Err(AppError::Registry(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl RegistryClient for MockRegistry {
    fn registry_name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, id: &PromptId) -> AppResult<TemplateRecord> {
        self.record(RecordedCall::Fetch(id.clone()));
        self.check_failure()?;

        self.template
            .clone()
            .ok_or_else(|| AppError::Registry(format!("Prompt '{}' not found", id)))
    }

    async fn publish(
        &self,
        id: &PromptId,
        template: &ChatTemplate,
        options: &PublishOptions,
    ) -> AppResult<String> {
        self.record(RecordedCall::Publish {
            id: id.clone(),
            template: template.clone(),
            options: options.clone(),
        });
        self.check_failure()?;

        Ok(format!("mock://hub/{}", id))
    }
}
