//! Integration tests for the async layer: client, dedup and generation

use async_trait::async_trait;
use loe_editor::{default_document, Value};
use loe_workspace::{
    ApiClient, Endpoint, GenerationArtifact, GenerationController, GenerationState, MockTransport,
    RequestError, RequestResult, Transport,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Generate transport whose responses are released by the test, one gate
/// per `schema.client` value
#[derive(Default)]
struct GatedTransport {
    gates: Mutex<HashMap<String, oneshot::Receiver<RequestResult<serde_json::Value>>>>,
    calls: AtomicUsize,
}

impl GatedTransport {
    fn gate(&self, client: &str) -> oneshot::Sender<RequestResult<serde_json::Value>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(client.to_string(), rx);
        tx
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn post_json(&self, _endpoint: Endpoint, body: String) -> RequestResult<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let request: serde_json::Value = serde_json::from_str(&body).unwrap();
        let client = request["schema"]["client"].as_str().unwrap().to_string();

        let gate = self.gates.lock().unwrap().remove(&client);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(RequestError::Transport("gate dropped".to_string()))),
            None => Err(RequestError::Transport(format!("no gate for {}", client))),
        }
    }
}

fn doc(client: &str) -> Value {
    Value::from(json!({ "loe_type": "rack_stack", "client": client }))
}

fn report(summary: &str) -> serde_json::Value {
    json!({ "summary": summary, "tasks": "", "open_questions": [] })
}

#[tokio::test]
async fn test_concurrent_identical_ingests_share_one_request() {
    let mock = Arc::new(MockTransport::with_latency(Duration::from_millis(30)));
    let client = ApiClient::new(mock.clone());

    let (a, b) = tokio::join!(
        client.ingest("Rack 6 APs", "rack_stack"),
        client.ingest("Rack 6 APs", "rack_stack")
    );

    assert_eq!(mock.calls(), 1);
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(client.in_flight(), 0);

    client.ingest("Rack 6 APs", "rack_stack").await.unwrap();
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_ingest_failure_is_shared() {
    let mock = Arc::new(MockTransport::with_latency(Duration::from_millis(10)));
    let client = ApiClient::new(mock.clone());

    let (a, b) = tokio::join!(client.ingest("", "rack_stack"), client.ingest("", "rack_stack"));

    assert_eq!(mock.calls(), 1);
    let a = a.unwrap_err();
    assert_eq!(a, b.unwrap_err());
    assert!(a.to_string().starts_with("HTTP 400 Bad Request"));
}

#[tokio::test]
async fn test_generate_uses_document_loe_type() {
    let client = ApiClient::new(Arc::new(MockTransport::new()));
    let artifact = client
        .generate(&default_document("rack_stack"), None)
        .await
        .unwrap();

    assert!(artifact.summary.starts_with("PROJECT SUMMARY"));
    assert_eq!(artifact.open_questions.len(), 2);
}

#[tokio::test]
async fn test_late_result_for_superseded_document_is_ignored() {
    let transport = Arc::new(GatedTransport::default());
    let release_a = transport.gate("A");
    let release_b = transport.gate("B");
    let controller = GenerationController::spawn(ApiClient::new(transport.clone()));

    let a = controller.select(doc("A")).await.unwrap();
    let b = controller.select(doc("B")).await.unwrap();
    assert_ne!(a, b);
    assert_eq!(controller.state(), GenerationState::Pending { input: b });

    release_b.send(Ok(report("for B"))).unwrap();
    let settled = controller.wait_settled(b).await.unwrap();
    assert_eq!(settled.artifact().map(|r| r.summary.as_str()), Some("for B"));

    // A's response arrives after B's and must not replace it
    release_a.send(Ok(report("for A"))).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        controller.state(),
        GenerationState::Success {
            input: b,
            artifact: GenerationArtifact {
                summary: "for B".to_string(),
                ..Default::default()
            }
        }
    );
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_superseded_result_arriving_first_keeps_newer_pending() {
    let transport = Arc::new(GatedTransport::default());
    let release_a = transport.gate("A");
    let release_b = transport.gate("B");
    let controller = GenerationController::spawn(ApiClient::new(transport.clone()));

    let a = controller.select(doc("A")).await.unwrap();
    let b = controller.select(doc("B")).await.unwrap();

    release_a.send(Ok(report("for A"))).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(controller.state(), GenerationState::Pending { input: b });

    release_b.send(Ok(report("for B"))).unwrap();
    let settled = controller.wait_settled(b).await.unwrap();
    assert_eq!(settled.input(), Some(b));
    assert_eq!(settled.artifact().map(|r| r.summary.as_str()), Some("for B"));
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_reselecting_current_document_does_not_resend() {
    let transport = Arc::new(GatedTransport::default());
    let release = transport.gate("A");
    let controller = GenerationController::spawn(ApiClient::new(transport.clone()));

    let first = controller.select(doc("A")).await.unwrap();
    let second = controller.select(doc("A")).await.unwrap();
    assert_eq!(first, second);

    release.send(Ok(report("done"))).unwrap();
    controller.wait_settled(first).await.unwrap();
    assert_eq!(controller.select(doc("A")).await, Some(first));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_then_manual_retry() {
    let transport = Arc::new(GatedTransport::default());
    let fail = transport.gate("A");
    let controller = GenerationController::spawn(ApiClient::new(transport.clone()));

    let first = controller.select(doc("A")).await.unwrap();
    fail.send(Err(RequestError::Transport("connection refused".to_string())))
        .unwrap();
    let settled = controller.wait_settled(first).await.unwrap();
    assert_eq!(
        settled.error(),
        Some(&RequestError::Transport("connection refused".to_string()))
    );

    let succeed = transport.gate("A");
    let retry = controller.restart(doc("A")).await.unwrap();
    assert_ne!(retry, first);
    succeed.send(Ok(report("second time"))).unwrap();

    let settled = controller.wait_settled(retry).await.unwrap();
    assert_eq!(settled.artifact().unwrap().summary, "second time");
}
