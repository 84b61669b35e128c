use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::errors::{ApiError, Result};

const DELEGATE_TIMEOUT: Duration = Duration::from_secs(25);

/// Outcome of asking the delegate service for a track's file.
///
/// The delegate only ever returns the check payload; when the file is cached,
/// the direct-download link is synthesized locally from the same track URL.
/// When it is not cached the check payload (typically a progress indicator)
/// is passed through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DownloadDescriptor {
    Cached { link: String },
    Pending(Value),
}

impl DownloadDescriptor {
    /// Build a descriptor from the delegate's check payload
    pub fn from_check(check: Value, track_url: &str, download_url: &str) -> Self {
        let cached = check
            .get("cached")
            .map(truthy)
            .unwrap_or(false);

        if cached {
            let link = format!("{}?url={}", download_url, urlencoding::encode(track_url));
            tracing::info!("Download link available: {}", link);
            DownloadDescriptor::Cached { link }
        } else {
            DownloadDescriptor::Pending(check)
        }
    }
}

// The delegate is loose about the `cached` field's type.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Client for the external direct-download checker
pub struct DelegateClient {
    client: Client,
    config: Arc<ApiConfig>,
}

impl DelegateClient {
    pub fn new(client: Client, config: Arc<ApiConfig>) -> Self {
        Self { client, config }
    }

    /// Ask the delegate whether a file for `track_url` is cached
    pub async fn resolve(&self, track_url: &str) -> Result<DownloadDescriptor> {
        let check_endpoint = format!(
            "{}?url={}",
            self.config.delegate_check_url,
            urlencoding::encode(track_url)
        );
        tracing::info!("Checking download availability: {}", check_endpoint);

        let response = self
            .client
            .get(&check_endpoint)
            .timeout(DELEGATE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::DelegateUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Download check failed: {}", status);
            return Err(ApiError::DelegateUnavailable(status.to_string()));
        }

        let check: Value = response
            .json()
            .await
            .map_err(|e| ApiError::DelegateUnavailable(e.to_string()))?;
        tracing::info!("Download check result: {}", check);

        Ok(DownloadDescriptor::from_check(
            check,
            track_url,
            &self.config.delegate_download_url,
        ))
    }
}
