//! HTTP seam between the wizard and the extraction/generation backend.

use crate::errors::{RequestError, RequestResult};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Backend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Ingest,
    Generate,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Ingest => "/ingest",
            Endpoint::Generate => "/generate",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Sends one serialized JSON body and returns the decoded JSON response.
///
/// The body is passed pre-serialized so that request deduplication and
/// the wire agree on the exact bytes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, endpoint: Endpoint, body: String) -> RequestResult<serde_json::Value>;
}

/// Transport over reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    api_base: String,
}

impl HttpTransport {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> RequestResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let api_base = api_base.into().trim_end_matches('/').to_string();

        Ok(Self { client, api_base })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.api_base, endpoint.path())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, endpoint: Endpoint, body: String) -> RequestResult<serde_json::Value> {
        let url = self.url(endpoint);
        tracing::info!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("POST {} failed with {}", url, status);
            return Err(RequestError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                detail,
            });
        }

        Ok(response.json().await?)
    }
}
