//! Application layer - Use cases and application services
//!
//! This layer orchestrates domain objects to fulfill use cases.
//! It's responsible for:
//! - Resolving per-call configuration
//! - Validating requests before they reach the call engine
//! - Starting call engine sessions

pub mod config_resolver;
pub mod outbound_call;

pub use config_resolver::ConfigResolver;
pub use outbound_call::OutboundCallOrchestrator;
