//! One-directional event channel from a call engine session to an event sink

use crate::domain::call::event::{CallEvent, EventSink};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Producer half handed to a running call
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::UnboundedSender<CallEvent>,
}

impl EventPublisher {
    /// Queue an event for delivery. Never blocks.
    pub fn publish(&self, event: CallEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!("Event pump closed, dropping {}", e.0.kind);
        }
    }
}

/// Spawn a task that feeds subscribed events to `sink` until every
/// publisher has been dropped.
pub fn spawn_event_pump(sink: Arc<dyn EventSink>) -> (EventPublisher, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<CallEvent>();

    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if sink.is_subscribed(event.kind) {
                sink.handle(&event);
            }
        }
        debug!("Event pump finished");
    });

    (EventPublisher { tx }, handle)
}
