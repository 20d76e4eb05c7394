//! Call bounded context - requests, resolved configuration, engine port and lifecycle events

pub mod engine;
pub mod event;
pub mod request;
pub mod value_object;

pub use engine::{CallEngine, CallHandle, CallSession};
pub use event::{CallEvent, EventKind, EventSink};
pub use request::{CallRequest, InboundCallWebhook};
pub use value_object::{
    ActionConfig, AgentConfig, BaseMessage, CallDirection, ResolvedCallConfig, SynthesizerConfig,
    TelephonyConfig, TranscriberConfig, TwilioConfig, VonageConfig,
};

#[cfg(test)]
pub use engine::MockCallEngine;
