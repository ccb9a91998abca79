//! HTTP client for the Mondrian REST metadata endpoint.
//!
//! One GET, no retries. Non-2xx responses are errors: an error page must never
//! be packed as if it were schema metadata.

use serde_json::Value;

use crate::types::{ExportConfig, ExportError, ExportResult};

const USER_AGENT: &str = concat!("metadata-pack/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body kept for diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// Fetches the metadata document for one named connection.
#[derive(Clone)]
pub struct MetadataClient {
    client: reqwest::Client,
    url: String,
    connection_name: String,
}

impl MetadataClient {
    /// Build a client with the configured endpoint and request timeout.
    pub fn new(config: &ExportConfig) -> ExportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ExportError::Connection)?;

        Ok(Self::with_client(client, config))
    }

    /// Use a caller-supplied reqwest client.
    pub fn with_client(client: reqwest::Client, config: &ExportConfig) -> Self {
        Self {
            client,
            url: config.metadata_url.clone(),
            connection_name: config.connection_name.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn connection_name(&self) -> &str {
        &self.connection_name
    }

    /// GET the metadata and decode the body as JSON.
    pub async fn fetch(&self) -> ExportResult<Value> {
        tracing::info!(
            "Requesting metadata for connection {} from {}",
            self.connection_name,
            self.url
        );

        let response = self
            .client
            .get(&self.url)
            .query(&[("connectionName", self.connection_name.as_str())])
            .send()
            .await
            .map_err(ExportError::Connection)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Metadata service answered {status}");
            return Err(ExportError::HttpStatus {
                status: status.as_u16(),
                body: error_body(response.text().await),
            });
        }

        let body = response.bytes().await.map_err(ExportError::Connection)?;
        tracing::debug!("Received {} bytes of metadata", body.len());

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Diagnostic text for a failed response, even when its body is unreadable.
fn error_body<E: std::fmt::Display>(read: Result<String, E>) -> String {
    match read {
        Ok(body) => truncate(body, MAX_ERROR_BODY),
        Err(e) => {
            tracing::debug!("Could not read error body: {e}");
            format!("<unreadable body: {e}>")
        }
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}
