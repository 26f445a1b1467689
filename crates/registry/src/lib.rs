//! Prompt registry integration for promptsync.
//!
//! This crate hides the hosted prompt hub behind the [`RegistryClient`]
//! trait so the pull and push flows can run against the real service or an
//! in-memory fake.
//!
//! # Providers
//! - **Hub**: LangSmith-compatible prompt hub over HTTPS
//! - **Mock**: in-memory registry that records every call
//!
//! # Example
//! ```no_run
//! use promptsync_registry::{HubClient, PromptId, RegistryClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HubClient::new("lsv2_...");
//! let id: PromptId = "leonanluppi/bug_to_user_story_v1".parse()?;
//! let record = client.fetch(&id).await?;
//! println!("{}", record.template);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod manifest;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::RegistryClient;
pub use factory::create_client;
pub use providers::{HubClient, MockRegistry, RecordedCall};
pub use types::{
    extract_variables, ChatMessage, ChatTemplate, MessageRole, PromptId, PublishOptions,
    TemplateRecord,
};
