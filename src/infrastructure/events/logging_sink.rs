//! Event sink that writes call lifecycle events to a log backend
use crate::domain::call::event::{CallEvent, EventKind, EventSink};
use metrics::counter;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{info, warn};

/// Where the logging sink writes events
pub trait EventLogBackend: Send + Sync {
    fn record(&self, event: &CallEvent) -> Result<(), String>;
}

/// Backend that emits one `tracing` record per event
#[derive(Debug, Default)]
pub struct TracingEventBackend;

impl EventLogBackend for TracingEventBackend {
    fn record(&self, event: &CallEvent) -> Result<(), String> {
        info!(
            conversation_id = %event.conversation_id,
            event_id = %event.metadata.event_id,
            kind = %event.kind,
            payload = %event.payload,
            "Event received"
        );
        Ok(())
    }
}

/// Subscribes to a fixed set of event kinds and logs each one
///
/// Backend failures never reach the caller: they are reported with `warn!`
/// and counted in `event_sink_failures_total`.
pub struct LoggingEventSink {
    subscriptions: HashSet<EventKind>,
    backend: Arc<dyn EventLogBackend>,
}

impl LoggingEventSink {
    /// Every event kind, logged through `tracing`
    pub fn new() -> Self {
        Self::with_backend(Arc::new(TracingEventBackend))
    }

    pub fn with_backend(backend: Arc<dyn EventLogBackend>) -> Self {
        Self::with_subscriptions(EventKind::ALL, backend)
    }

    pub fn with_subscriptions(
        kinds: impl IntoIterator<Item = EventKind>,
        backend: Arc<dyn EventLogBackend>,
    ) -> Self {
        Self {
            subscriptions: kinds.into_iter().collect(),
            backend,
        }
    }
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LoggingEventSink {
    fn subscriptions(&self) -> &HashSet<EventKind> {
        &self.subscriptions
    }

    fn handle(&self, event: &CallEvent) {
        counter!("call_events_total", "kind" => event.kind.as_str()).increment(1);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.backend.record(event)));
        let failure = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(_) => "backend panicked".to_string(),
        };

        counter!("event_sink_failures_total").increment(1);
        warn!(
            conversation_id = %event.conversation_id,
            kind = %event.kind,
            "Failed to log call event: {}",
            failure
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::value_objects::ConversationId;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryBackend {
        events: Mutex<Vec<CallEvent>>,
    }

    impl EventLogBackend for MemoryBackend {
        fn record(&self, event: &CallEvent) -> Result<(), String> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct UnavailableBackend;

    impl EventLogBackend for UnavailableBackend {
        fn record(&self, _event: &CallEvent) -> Result<(), String> {
            Err("log backend unavailable".to_string())
        }
    }

    struct PanickingBackend;

    impl EventLogBackend for PanickingBackend {
        fn record(&self, _event: &CallEvent) -> Result<(), String> {
            panic!("log backend exploded");
        }
    }

    fn event(kind: EventKind) -> CallEvent {
        CallEvent::new(
            ConversationId::from_string("conv-1".to_string()),
            kind,
            json!({"detail": "x"}),
        )
    }

    #[test]
    fn test_default_sink_subscribes_to_all_kinds() {
        let sink = LoggingEventSink::new();
        assert_eq!(sink.subscriptions().len(), EventKind::ALL.len());
        for kind in EventKind::ALL {
            assert!(sink.is_subscribed(kind));
        }
    }

    #[test]
    fn test_records_events() {
        let backend = Arc::new(MemoryBackend::default());
        let sink = LoggingEventSink::with_backend(backend.clone());

        sink.handle(&event(EventKind::PhoneCallStarted));
        sink.handle(&event(EventKind::PhoneCallEnded));

        let events = backend.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, EventKind::PhoneCallEnded);
    }

    #[test]
    fn test_backend_failure_is_swallowed() {
        let sink = LoggingEventSink::with_backend(Arc::new(UnavailableBackend));
        sink.handle(&event(EventKind::ActionFailed));
        sink.handle(&event(EventKind::ActionFinished));
        // reaching this line is the assertion: the caller continues normally
    }

    #[test]
    fn test_backend_panic_is_swallowed() {
        let sink = LoggingEventSink::with_backend(Arc::new(PanickingBackend));
        sink.handle(&event(EventKind::HumanAudioStart));
        sink.handle(&event(EventKind::HumanAudioStop));
    }

    #[test]
    fn test_custom_subscriptions() {
        let sink = LoggingEventSink::with_subscriptions(
            [EventKind::PhoneCallConnected],
            Arc::new(TracingEventBackend),
        );
        assert!(sink.is_subscribed(EventKind::PhoneCallConnected));
        assert!(!sink.is_subscribed(EventKind::SynthesisComplete));
    }
}
