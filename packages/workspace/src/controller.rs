//! # Generation Controller
//!
//! Runs a [`GenerationLifecycle`] on its own task. Callers send commands;
//! request tasks report back on a second channel tagged with the input
//! they were started for; the visible state goes out on a watch channel.
//!
//! ```text
//!   select(doc) ──► commands ──┐
//!                              ▼
//!                     ┌─────────────────┐  spawn   ┌──────────────┐
//!                     │ lifecycle task  │ ───────► │ request task │
//!                     └─────────────────┘          └──────────────┘
//!                        │          ▲                     │
//!                  watch │          └──── settled ◄───────┘
//!                        ▼
//!                  subscribers
//! ```

use crate::api::ApiClient;
use crate::errors::RequestResult;
use crate::generation::{
    GenerationArtifact, GenerationLifecycle, GenerationState, GenerationTicket, InputId, Selection,
};
use loe_editor::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_stream::wrappers::WatchStream;

enum Command {
    Select {
        document: Value,
        force: bool,
        reply: oneshot::Sender<InputId>,
    },
}

type Settled = (InputId, RequestResult<GenerationArtifact>);

/// Handle to a running generation task. Dropping every handle stops the
/// task; requests already on the wire finish and are ignored.
#[derive(Clone)]
pub struct GenerationController {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<GenerationState>,
}

impl GenerationController {
    /// Start the lifecycle task on the current tokio runtime
    pub fn spawn(client: ApiClient) -> Self {
        let (commands, command_rx) = mpsc::channel(32);
        let (state_tx, state) = watch::channel(GenerationState::Idle);

        tokio::spawn(run(client, command_rx, state_tx));

        Self { commands, state }
    }

    /// Make `document` the current input; returns its id. Re-selecting the
    /// current document does not issue a second request.
    pub async fn select(&self, document: Value) -> Option<InputId> {
        self.send(document, false).await
    }

    /// Start over for `document` even if it is already current
    pub async fn restart(&self, document: Value) -> Option<InputId> {
        self.send(document, true).await
    }

    async fn send(&self, document: Value, force: bool) -> Option<InputId> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Select {
                document,
                force,
                reply,
            })
            .await
            .ok()?;
        rx.await.ok()
    }

    /// Current visible state
    pub fn state(&self) -> GenerationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.state.clone()
    }

    /// Every visible state from now on, starting with the current one
    pub fn updates(&self) -> WatchStream<GenerationState> {
        WatchStream::new(self.state.clone())
    }

    /// Wait until `input` is no longer pending and return the visible state
    /// at that point. That state belongs to a newer input if `input` was
    /// superseded in the meantime.
    pub async fn wait_settled(&self, input: InputId) -> Option<GenerationState> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|state| !(state.is_pending() && state.input() == Some(input)))
            .await
            .ok()?;
        Some(state.clone())
    }
}

async fn run(
    client: ApiClient,
    mut commands: mpsc::Receiver<Command>,
    state: watch::Sender<GenerationState>,
) {
    let mut lifecycle = GenerationLifecycle::new();
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settled>();

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(Command::Select { document, force, reply }) = command else {
                    break;
                };

                let selection = if force {
                    Selection::Started(lifecycle.restart(document))
                } else {
                    lifecycle.select(document)
                };

                match selection {
                    Selection::Started(ticket) => {
                        state.send_replace(lifecycle.state().clone());
                        let _ = reply.send(ticket.input);
                        start_request(&client, ticket, settled_tx.clone());
                    }
                    Selection::Unchanged(input) => {
                        let _ = reply.send(input);
                    }
                }
            }
            Some((input, result)) = settled_rx.recv() => {
                if lifecycle.settle(input, result) {
                    state.send_replace(lifecycle.state().clone());
                }
            }
        }
    }

    tracing::debug!("Generation controller stopped");
}

fn start_request(client: &ApiClient, ticket: GenerationTicket, settled: mpsc::UnboundedSender<Settled>) {
    let client = client.clone();
    tokio::spawn(async move {
        let result = client.generate(&ticket.document, None).await;
        // The controller may be gone; nothing left to tell
        let _ = settled.send((ticket.input, result));
    });
}
