//! Call lifecycle events and the sink that observes them

use crate::domain::shared::events::{DomainEvent, EventMetadata};
use crate::domain::shared::value_objects::ConversationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Kinds of lifecycle events a call engine produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PhoneCallConnected,
    PhoneCallEnded,
    PhoneCallStarted,
    TranscriptionComplete,
    SynthesisComplete,
    AgentGeneratedAudio,
    HumanAudioStart,
    HumanAudioStop,
    ActionStarted,
    ActionFinished,
    ActionFailed,
}

impl EventKind {
    pub const ALL: [EventKind; 11] = [
        EventKind::PhoneCallConnected,
        EventKind::PhoneCallEnded,
        EventKind::PhoneCallStarted,
        EventKind::TranscriptionComplete,
        EventKind::SynthesisComplete,
        EventKind::AgentGeneratedAudio,
        EventKind::HumanAudioStart,
        EventKind::HumanAudioStop,
        EventKind::ActionStarted,
        EventKind::ActionFinished,
        EventKind::ActionFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PhoneCallConnected => "event_phone_call_connected",
            EventKind::PhoneCallEnded => "event_phone_call_ended",
            EventKind::PhoneCallStarted => "event_phone_call_started",
            EventKind::TranscriptionComplete => "event_transcription_complete",
            EventKind::SynthesisComplete => "event_synthesis_complete",
            EventKind::AgentGeneratedAudio => "event_agent_generated_audio",
            EventKind::HumanAudioStart => "event_human_audio_start",
            EventKind::HumanAudioStop => "event_human_audio_stop",
            EventKind::ActionStarted => "event_action_started",
            EventKind::ActionFinished => "event_action_finished",
            EventKind::ActionFailed => "event_action_failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lifecycle notification for one conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEvent {
    pub metadata: EventMetadata,
    pub conversation_id: ConversationId,
    pub kind: EventKind,
    pub payload: Value,
}

impl CallEvent {
    pub fn new(conversation_id: ConversationId, kind: EventKind, payload: Value) -> Self {
        Self {
            metadata: EventMetadata::new(),
            conversation_id,
            kind,
            payload,
        }
    }
}

impl DomainEvent for CallEvent {
    fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata.occurred_at
    }
}

/// Observer of call lifecycle events
///
/// `handle` is called from the event delivery task and must return quickly.
/// It has no error channel: implementations swallow their own failures.
pub trait EventSink: Send + Sync {
    /// Event kinds this sink wants; fixed for the sink's lifetime
    fn subscriptions(&self) -> &HashSet<EventKind>;

    fn handle(&self, event: &CallEvent);

    fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions().contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_serde_names() {
        let json = serde_json::to_string(&EventKind::HumanAudioStart).unwrap();
        assert_eq!(json, "\"human_audio_start\"");

        let kind: EventKind = serde_json::from_str("\"action_failed\"").unwrap();
        assert_eq!(kind, EventKind::ActionFailed);
    }

    #[test]
    fn test_all_kinds_are_distinct() {
        let set: HashSet<EventKind> = EventKind::ALL.into_iter().collect();
        assert_eq!(set.len(), 11);
    }

    #[test]
    fn test_call_event_is_domain_event() {
        let event = CallEvent::new(
            ConversationId::from_string("c1".to_string()),
            EventKind::PhoneCallEnded,
            Value::Null,
        );
        assert_eq!(event.event_type(), "event_phone_call_ended");
        assert_eq!(event.occurred_at(), event.metadata.occurred_at);
    }
}
