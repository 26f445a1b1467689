//! Registry client factory.
//!
//! Builds the concrete client from resolved configuration values so the
//! commands never construct HTTP clients themselves.

use crate::client::RegistryClient;
use crate::providers::HubClient;
use std::sync::Arc;

/// Create a registry client for the hub at `endpoint`.
///
/// # Arguments
/// * `endpoint` - Hub API base URL
/// * `web_url` - Hub web UI base URL, used for returned links
/// * `api_key` - Registry API key
///
/// # Errors
/// Returns error if:
/// - The endpoint is not an http(s) URL
/// - The API key is empty
pub fn create_client(
    endpoint: &str,
    web_url: &str,
    api_key: &str,
) -> Result<Arc<dyn RegistryClient>, String> {
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(format!(
            "Registry endpoint must be an http(s) URL: {}",
            endpoint
        ));
    }

    if api_key.trim().is_empty() {
        return Err("Registry API key is empty".to_string());
    }

    tracing::debug!("Creating hub client for {}", endpoint);
    Ok(Arc::new(HubClient::with_base_url(endpoint, web_url, api_key)))
}
