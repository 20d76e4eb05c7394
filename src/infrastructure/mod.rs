//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - Built-in actions
//! - Prompt template loading
//! - Event delivery and logging
//! - Call engine implementations

pub mod actions;
pub mod engine;
pub mod events;
pub mod prompts;
