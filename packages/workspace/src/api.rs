//! Typed client for the ingest and generate endpoints.

use crate::errors::{RequestError, RequestResult};
use crate::generation::GenerationArtifact;
use crate::single_flight::{InFlight, RequestDeduper};
use crate::transport::{Endpoint, Transport};
use futures::FutureExt;
use loe_editor::Value;
use serde_json::json;
use std::sync::Arc;

/// Backend client. Clones share the transport and the pending-request table.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    deduper: RequestDeduper,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            deduper: RequestDeduper::new(),
        }
    }

    /// Requests currently on the wire
    pub fn in_flight(&self) -> usize {
        self.deduper.in_flight()
    }

    /// Extract a document from free text
    pub async fn ingest(&self, text: &str, loe_type: &str) -> RequestResult<Value> {
        let body = json!({ "text": text, "loe_type": loe_type }).to_string();
        let response = self.post(Endpoint::Ingest, body).await?;

        match response.get("schema") {
            Some(schema) => Ok(Value::from(schema.clone())),
            None => Err(RequestError::Decode(
                "ingest response has no 'schema'".to_string(),
            )),
        }
    }

    /// Produce the report for a document. `loe_type` falls back to the
    /// document's own `loe_type` field.
    pub async fn generate(
        &self,
        document: &Value,
        loe_type: Option<&str>,
    ) -> RequestResult<GenerationArtifact> {
        let loe_type = loe_type.or_else(|| document.get("loe_type").and_then(Value::as_str));
        let body = json!({
            "schema": serde_json::Value::from(document),
            "loe_type": loe_type,
        })
        .to_string();

        let response = self.post(Endpoint::Generate, body).await?;
        Ok(GenerationArtifact::from_response(&response))
    }

    fn post(&self, endpoint: Endpoint, body: String) -> InFlight {
        let transport = Arc::clone(&self.transport);
        self.deduper.dispatch(endpoint, body, move |payload| {
            async move { transport.post_json(endpoint, payload).await }.boxed()
        })
    }
}
