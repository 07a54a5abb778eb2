// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Broadcast hub fanning registry events out to connected viewers.
//!
//! A single spawned task exclusively owns the viewer set; join, leave and
//! broadcast requests arrive as messages on a command channel, so no lock
//! is ever taken around the set. Commands are processed in FIFO order,
//! which preserves per-device ordering of location events.

use crate::models::{Envelope, LocationUpdate};
use crate::services::DeviceRegistry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Handle a viewer uses to receive serialized envelopes.
pub type ViewerSender = mpsc::UnboundedSender<String>;

/// Identity of a connected viewer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewerId(u64);

enum HubCommand {
    Join { id: ViewerId, sender: ViewerSender },
    Leave { id: ViewerId },
    DeviceList,
    Location(LocationUpdate),
    ViewerCount { reply: oneshot::Sender<usize> },
}

/// Cloneable handle to the hub task.
#[derive(Clone)]
pub struct BroadcastHub {
    tx: mpsc::UnboundedSender<HubCommand>,
    next_id: Arc<AtomicU64>,
}

impl BroadcastHub {
    /// Spawn the hub task. The registry is used to snapshot the device list
    /// for join replays and `dispositivos` broadcasts.
    pub fn spawn(registry: Arc<DeviceRegistry>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_hub(rx, registry));
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a viewer channel. The current device list is replayed to it
    /// before any subsequent event.
    pub fn join(&self, sender: ViewerSender) -> ViewerId {
        let id = ViewerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let _ = self.tx.send(HubCommand::Join { id, sender });
        id
    }

    /// Remove a viewer channel. Idempotent.
    pub fn leave(&self, id: ViewerId) {
        let _ = self.tx.send(HubCommand::Leave { id });
    }

    /// Push a fresh full device snapshot to all viewers.
    pub fn broadcast_device_list(&self) {
        let _ = self.tx.send(HubCommand::DeviceList);
    }

    /// Push a single-device location delta to all viewers.
    pub fn broadcast_location(&self, update: LocationUpdate) {
        let _ = self.tx.send(HubCommand::Location(update));
    }

    /// Number of currently connected viewers.
    ///
    /// Processed after any commands already queued, so awaiting this also
    /// acts as a flush barrier in tests.
    pub async fn viewer_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(HubCommand::ViewerCount { reply }).is_err() {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}

async fn run_hub(mut rx: mpsc::UnboundedReceiver<HubCommand>, registry: Arc<DeviceRegistry>) {
    let mut viewers: HashMap<ViewerId, ViewerSender> = HashMap::new();

    while let Some(command) = rx.recv().await {
        match command {
            HubCommand::Join { id, sender } => {
                let replay = Envelope::Dispositivos(registry.list());
                match serde_json::to_string(&replay) {
                    Ok(text) => {
                        // A channel that closed mid-replay is dropped, not an error
                        if sender.send(text).is_ok() {
                            viewers.insert(id, sender);
                            tracing::info!(viewers = viewers.len(), "Viewer connected");
                        } else {
                            tracing::debug!("Viewer closed during replay");
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "Failed to serialize device list replay");
                    }
                }
            }
            HubCommand::Leave { id } => {
                if viewers.remove(&id).is_some() {
                    tracing::info!(viewers = viewers.len(), "Viewer disconnected");
                }
            }
            HubCommand::DeviceList => {
                broadcast(&mut viewers, &Envelope::Dispositivos(registry.list()));
            }
            HubCommand::Location(update) => {
                broadcast(&mut viewers, &Envelope::UbicacionDispositivo(update));
            }
            HubCommand::ViewerCount { reply } => {
                let _ = reply.send(viewers.len());
            }
        }
    }
}

/// Serialize once and push the same bytes to every viewer. A failed send is
/// an implicit leave; remaining viewers are unaffected.
fn broadcast(viewers: &mut HashMap<ViewerId, ViewerSender>, envelope: &Envelope) {
    let text = match serde_json::to_string(envelope) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize broadcast envelope");
            return;
        }
    };

    viewers.retain(|_, sender| {
        let delivered = sender.send(text.clone()).is_ok();
        if !delivered {
            tracing::debug!("Dropping closed viewer channel");
        }
        delivered
    });
}
