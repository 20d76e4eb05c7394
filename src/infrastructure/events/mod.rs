//! Call event delivery and logging

pub mod logging_sink;
pub mod pump;

pub use logging_sink::{EventLogBackend, LoggingEventSink, TracingEventBackend};
pub use pump::{spawn_event_pump, EventPublisher};
