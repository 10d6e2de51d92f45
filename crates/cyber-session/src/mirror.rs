//! # Mirror
//!
//! Write-through copy of the account document to the provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionStore (sync, &mut self)                                        │
//! │       │ enqueue(identity_id, snapshot)     never awaits                │
//! │       ▼                                                                 │
//! │  mpsc::unbounded_channel ─────────────────────────────┐                 │
//! │                                                       ▼                 │
//! │                                    mirror task (one per store)         │
//! │                                    save_account(..).await              │
//! │                                    in enqueue order                    │
//! │                                       │                                 │
//! │                                       ├── Ok   → debug!                │
//! │                                       └── Err  → warn!, dropped        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A single consumer applies writes one at a time, so an older snapshot can
//! never land after a newer one. There is no retry.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::backend::SessionBackend;
use cyber_core::AccountDocument;

enum MirrorCommand {
    Save {
        identity_id: String,
        doc: AccountDocument,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer. Dropping it ends the task once the
/// queue drains.
#[derive(Debug)]
pub struct Mirror {
    tx: mpsc::UnboundedSender<MirrorCommand>,
}

impl Mirror {
    /// Spawns the writer task. Must be called inside a tokio runtime.
    pub fn spawn(backend: Arc<dyn SessionBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(backend, rx));
        Mirror { tx }
    }

    /// Queues a snapshot for `identity_id`. Returns immediately.
    pub fn enqueue(&self, identity_id: &str, doc: AccountDocument) {
        let command = MirrorCommand::Save {
            identity_id: identity_id.to_string(),
            doc,
        };

        if self.tx.send(command).is_err() {
            warn!(identity_id = %identity_id, "Mirror task gone, snapshot dropped");
        }
    }

    /// Waits until every snapshot queued before this call has been applied
    /// (or has failed).
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();

        if self.tx.send(MirrorCommand::Flush(done_tx)).is_err() {
            return;
        }

        let _ = done_rx.await;
    }
}

async fn run(backend: Arc<dyn SessionBackend>, mut rx: mpsc::UnboundedReceiver<MirrorCommand>) {
    debug!("Mirror task started");

    while let Some(command) = rx.recv().await {
        match command {
            MirrorCommand::Save { identity_id, doc } => {
                match backend.save_account(&identity_id, &doc).await {
                    Ok(()) => debug!(
                        identity_id = %identity_id,
                        credits = doc.credits.units(),
                        "Account mirrored"
                    ),
                    Err(e) => warn!(
                        identity_id = %identity_id,
                        error = %e,
                        "Account mirror write failed"
                    ),
                }
            }
            MirrorCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Mirror task stopped");
}
