//! # Single-flight request deduplication
//!
//! Identical requests issued while one is already outstanding attach to
//! the outstanding one instead of going to the wire again.
//!
//! ```text
//! dispatch(k) ──► pending? ──yes──► clone of the shared result
//!                    │
//!                    no
//!                    ▼
//!           spawn request task ──► settle ──► remove k ──► deliver
//! ```
//!
//! The key is the endpoint plus the exact payload bytes. The entry is
//! removed before the result is delivered, so a call made after
//! settlement always performs a fresh request. Nothing is cached.

use crate::errors::{RequestError, RequestResult};
use crate::transport::Endpoint;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Identity of an outstanding request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InFlightKey {
    pub endpoint: Endpoint,
    pub payload: String,
}

/// Eventual result shared by every caller of one request
pub type InFlight = Shared<BoxFuture<'static, RequestResult<serde_json::Value>>>;

/// Pending-request table, owned by the API client
#[derive(Clone, Default)]
pub struct RequestDeduper {
    inflight: Arc<Mutex<HashMap<InFlightKey, InFlight>>>,
}

impl RequestDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the outstanding request for `(endpoint, payload)` or start one
    /// with `send`. Must be called from within a tokio runtime; the request
    /// runs to completion even if every caller stops waiting.
    pub fn dispatch<F>(&self, endpoint: Endpoint, payload: String, send: F) -> InFlight
    where
        F: FnOnce(String) -> BoxFuture<'static, RequestResult<serde_json::Value>>,
    {
        let key = InFlightKey { endpoint, payload };
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = inflight.get(&key) {
            tracing::debug!("Joining in-flight {} request", endpoint);
            return existing.clone();
        }

        let request = send(key.payload.clone());
        let table = Arc::clone(&self.inflight);
        let settled_key = key.clone();

        let task = tokio::spawn(async move {
            let result = request.await;
            table
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&settled_key);
            result
        });

        let shared = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(RequestError::Transport(format!("request task failed: {}", e))),
            }
        }
        .boxed()
        .shared();

        inflight.insert(key, shared.clone());
        shared
    }

    /// Number of outstanding requests
    pub fn in_flight(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_send(
        calls: &Arc<AtomicUsize>,
        outcome: RequestResult<serde_json::Value>,
    ) -> impl FnOnce(String) -> BoxFuture<'static, RequestResult<serde_json::Value>> {
        let calls = Arc::clone(calls);
        move |_payload| {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                outcome
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_identical_requests_share_one_call() {
        let deduper = RequestDeduper::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = deduper.dispatch(
            Endpoint::Ingest,
            "{\"text\":\"hi\"}".to_string(),
            counting_send(&calls, Ok(json!({"schema": {}}))),
        );
        let second = deduper.dispatch(
            Endpoint::Ingest,
            "{\"text\":\"hi\"}".to_string(),
            counting_send(&calls, Ok(json!({"other": true}))),
        );
        assert_eq!(deduper.in_flight(), 1);

        let (a, b) = tokio::join!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap(), json!({"schema": {}}));
        assert_eq!(b.unwrap(), json!({"schema": {}}));
        assert_eq!(deduper.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_failure_reaches_every_caller() {
        let deduper = RequestDeduper::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let failure = RequestError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
            detail: "boom".to_string(),
        };

        let first = deduper.dispatch(
            Endpoint::Generate,
            "{}".to_string(),
            counting_send(&calls, Err(failure.clone())),
        );
        let second = deduper.dispatch(
            Endpoint::Generate,
            "{}".to_string(),
            counting_send(&calls, Ok(json!({}))),
        );

        let (a, b) = tokio::join!(first, second);
        assert_eq!(a.unwrap_err(), failure);
        assert_eq!(b.unwrap_err(), failure);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_settled_request_is_not_reused() {
        let deduper = RequestDeduper::new();
        let calls = Arc::new(AtomicUsize::new(0));

        deduper
            .dispatch(Endpoint::Ingest, "{}".to_string(), counting_send(&calls, Ok(json!(1))))
            .await
            .unwrap();
        let again = deduper
            .dispatch(Endpoint::Ingest, "{}".to_string(), counting_send(&calls, Ok(json!(2))))
            .await
            .unwrap();

        assert_eq!(again, json!(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_different_payload_or_endpoint_is_separate() {
        let deduper = RequestDeduper::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let a = deduper.dispatch(Endpoint::Ingest, "{\"a\":1}".to_string(), counting_send(&calls, Ok(json!(1))));
        let b = deduper.dispatch(Endpoint::Ingest, "{\"a\":2}".to_string(), counting_send(&calls, Ok(json!(2))));
        let c = deduper.dispatch(Endpoint::Generate, "{\"a\":1}".to_string(), counting_send(&calls, Ok(json!(3))));
        assert_eq!(deduper.in_flight(), 3);

        let (a, b, c) = tokio::join!(a, b, c);
        assert_eq!((a.unwrap(), b.unwrap(), c.unwrap()), (json!(1), json!(2), json!(3)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
