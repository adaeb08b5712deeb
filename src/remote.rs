//! Client for an out-of-process tool server
//!
//! Optional process isolation: document loading and vector operations can
//! run in a separate server process reached over local HTTP. The contract
//! is a synchronous request/response call of a named operation with JSON
//! arguments; transport or server failure surfaces as `RemoteUnavailable`.
//!
//! This wrapper stays entirely outside the core pipeline's data model and is
//! not wired into any CLI command: it is a library-level integration point
//! for embedders that want to push loading or indexing into a separate
//! process, and they construct a [`RemoteClient`] themselves.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;
use tracing::debug;

use crate::errors::DocRagError;
use crate::errors::Result;

/// HTTP client for a local tool server
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CallReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| DocRagError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check whether the server answers its health endpoint
    pub async fn healthy(&self) -> bool {
        let probe = Client::builder()
            .timeout(Duration::from_secs(3))
            .build();
        let Ok(probe) = probe else { return false };

        match probe.get(format!("{}/", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Invoke a named operation on the server
    pub async fn call(&self, operation: &str, arguments: Value) -> Result<Value> {
        let url = format!("{}/tools/call", self.base_url);
        debug!("Calling remote operation {} at {}", operation, url);

        let response = self
            .client
            .post(&url)
            .json(&build_call_payload(operation, arguments))
            .send()
            .await
            .map_err(|e| DocRagError::RemoteUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocRagError::RemoteUnavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let reply: CallReply = response
            .json()
            .await
            .map_err(|e| DocRagError::RemoteUnavailable(e.to_string()))?;

        if let Some(error) = reply.error {
            return Err(DocRagError::RemoteUnavailable(error));
        }

        Ok(reply.result.unwrap_or(Value::Null))
    }
}

fn build_call_payload(operation: &str, arguments: Value) -> Value {
    json!({
        "name": operation,
        "arguments": arguments,
    })
}
