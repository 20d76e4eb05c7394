//! Domain layer - Core business logic and rules
//!
//! This layer contains:
//! - Call requests, resolved call configuration and lifecycle events
//! - The call engine port
//! - Actions: schemas, handlers and the registry that dispatches them

pub mod action;
pub mod call;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};
