//! In-process stand-in for the backend, so the wizard runs without a server.

use crate::errors::{RequestError, RequestResult};
use crate::transport::{Endpoint, Transport};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned ingest and generate responses
#[derive(Debug, Default)]
pub struct MockTransport {
    latency: Duration,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency`
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            calls: AtomicUsize::new(0),
        }
    }

    /// Requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn ingest(request: &serde_json::Value) -> RequestResult<serde_json::Value> {
        let text = request
            .get("text")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if text.is_empty() {
            return Err(RequestError::Status {
                status: 400,
                reason: "Bad Request".to_string(),
                detail: json!({ "error": "Missing 'text'" }).to_string(),
            });
        }

        let mut schema = mock_schema();
        if let Some(loe_type) = request
            .get("loe_type")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            schema["loe_type"] = json!(loe_type);
        }
        schema["notes_raw"] = json!(text);

        Ok(json!({ "schema": schema }))
    }

    fn generate() -> serde_json::Value {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        json!({
            "summary": format!("PROJECT SUMMARY\nMock summary generated at {}.", now),
            "tasks": "PROJECT TASKS\n- Do a thing\n- Do another thing",
            "open_questions": [
                "Any change approvals required?",
                "Out-of-hours constraints?"
            ]
        })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, endpoint: Endpoint, body: String) -> RequestResult<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Mock POST {}", endpoint);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let request: serde_json::Value = serde_json::from_str(&body).map_err(|e| RequestError::Status {
            status: 400,
            reason: "Bad Request".to_string(),
            detail: e.to_string(),
        })?;

        match endpoint {
            Endpoint::Ingest => Self::ingest(&request),
            Endpoint::Generate => Ok(Self::generate()),
        }
    }
}

fn mock_schema() -> serde_json::Value {
    json!({
        "client": "Mock Client",
        "project_name": "",
        "service": "Installation",
        "scope": "Rack & Stack",
        "environment": "On-prem",
        "timeline": "2 weeks",
        "sites": [{ "name": "HQ", "address": "1 Main St" }],
        "devices": [],
        "bom": [{ "type": "AP", "model": "AP64", "qty": 6, "notes": "" }],
        "staging": {
            "ic_used": false,
            "doa": false,
            "burn_in": false,
            "labelling": "",
            "packing": ""
        },
        "rollout": { "waves": "", "floors": "", "ooh_windows": "", "change_approvals": "" },
        "governance": { "pm": "", "comms_channels": "", "escalation": "" },
        "visits_caps": {
            "install_max_visits": null,
            "post_deploy_max_visits": null,
            "site_survey_window_weeks": null
        },
        "counts": { "aps_ordered": null, "aps_to_mount": null, "devices_total": null },
        "wave_plan": [{
            "phase": "",
            "floor": "",
            "allocations": [{ "model": "", "qty": 0 }]
        }],
        "brackets": [],
        "prerequisites": [],
        "assumptions": [],
        "out_of_scope": [],
        "handover": { "docs": "", "acceptance_criteria": "" },
        "constraints": [],
        "deliverables": []
    })
}
