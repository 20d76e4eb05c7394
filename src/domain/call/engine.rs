//! Call engine port
//!
//! The engine runs the live conversation (carrier signaling, audio,
//! transcription, agent turns, synthesis). This crate only configures and
//! starts it.

use super::event::EventSink;
use super::value_object::{CallDirection, ResolvedCallConfig, TelephonyConfig};
use crate::domain::action::ActionRegistry;
use crate::domain::shared::error::Result;
use crate::domain::shared::value_objects::ConversationId;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Everything the engine needs to start one conversation
#[derive(Clone)]
pub struct CallSession {
    pub direction: CallDirection,
    pub recipient: String,
    pub caller: String,
    /// Caller-assigned id, passed through unchanged
    pub conversation_id: Option<ConversationId>,
    pub config: ResolvedCallConfig,
    pub telephony: TelephonyConfig,
    pub actions: Arc<ActionRegistry>,
    pub events: Arc<dyn EventSink>,
}

impl fmt::Debug for CallSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSession")
            .field("direction", &self.direction)
            .field("recipient", &self.recipient)
            .field("caller", &self.caller)
            .field("conversation_id", &self.conversation_id)
            .field("config", &self.config)
            .field("telephony", &self.telephony)
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

/// Reference to a started call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallHandle {
    pub conversation_id: ConversationId,
}

/// Starts conversations on behalf of the orchestrator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallEngine: Send + Sync {
    /// Establish the call and return once it has been initiated.
    ///
    /// The conversation itself keeps running after this returns; progress is
    /// reported through the session's event sink. Failures to initiate are
    /// reported as `DomainError::CallStart`.
    async fn start(&self, session: CallSession) -> Result<CallHandle>;
}
