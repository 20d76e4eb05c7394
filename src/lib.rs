//! Outdial - outbound call orchestration shim
//!
//! Accepts requests to place phone calls, resolves the conversational
//! configuration for each call (agent prompt, speech synthesis, speech
//! transcription), and hands the call to a call engine. Agents can invoke
//! registered actions mid-call; lifecycle events flow to an event sink.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::error::Result;
