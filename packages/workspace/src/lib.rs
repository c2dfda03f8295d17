//! # LoE Workspace
//!
//! Async side of the LoE assistant: talking to the backend, keeping
//! generation results tied to the document they were made for, and
//! persisting the session between runs.

pub mod api;
pub mod controller;
pub mod errors;
pub mod export;
pub mod generation;
pub mod mock;
pub mod single_flight;
pub mod store;
pub mod transport;

pub use api::ApiClient;
pub use controller::GenerationController;
pub use errors::{RequestError, RequestResult, StoreError, StoreResult};
pub use export::{build_markdown, strip_heading, write_markdown, DEFAULT_EXPORT_NAME};
pub use generation::{
    GenerationArtifact, GenerationLifecycle, GenerationState, GenerationTicket, InputId, Selection,
};
pub use mock::MockTransport;
pub use single_flight::{InFlight, InFlightKey, RequestDeduper};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use transport::{Endpoint, HttpTransport, Transport};
