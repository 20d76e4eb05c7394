//! Built-in actions

pub mod log_conversation_state;

pub use log_conversation_state::{LogConversationState, LOG_CONVERSATION_STATE};

use crate::domain::action::{ActionDescriptor, ActionRegistry};
use crate::domain::shared::error::Result;

/// Registry holding every built-in action
pub fn default_registry() -> Result<ActionRegistry> {
    let mut registry = ActionRegistry::new();
    registry.register(ActionDescriptor::new(LogConversationState::new()))?;
    Ok(registry)
}
