//! In-process call engine for local runs and tests
//!
//! Places no real call. Each session plays a scripted conversation: the call
//! connects, the agent speaks its initial message, every declared action is
//! invoked once with that turn, and the call hangs up. All progress goes out
//! as lifecycle events, exactly as a carrier-backed engine would report it.

use crate::domain::action::{ActionInvocation, ActionRegistry};
use crate::domain::call::engine::{CallEngine, CallHandle, CallSession};
use crate::domain::call::event::{CallEvent, EventKind};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::error::Result;
use crate::domain::shared::value_objects::ConversationId;
use crate::infrastructure::events::{spawn_event_pump, EventPublisher};
use async_trait::async_trait;
use metrics::gauge;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct LoopbackCallEngine {
    turn_delay: Duration,
    active: Arc<RwLock<HashSet<ConversationId>>>,
}

impl LoopbackCallEngine {
    pub fn new(turn_delay: Duration) -> Self {
        Self {
            turn_delay,
            active: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Conversations that have started and not yet hung up
    pub async fn active_calls(&self) -> Vec<ConversationId> {
        self.active.read().await.iter().cloned().collect()
    }
}

impl Default for LoopbackCallEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[async_trait]
impl CallEngine for LoopbackCallEngine {
    async fn start(&self, session: CallSession) -> Result<CallHandle> {
        if !session.telephony.has_credentials() {
            return Err(DomainError::CallStart(format!(
                "{} credentials are incomplete",
                session.telephony.provider()
            )));
        }

        let conversation_id = session.conversation_id.clone().unwrap_or_default();

        {
            let mut active = self.active.write().await;
            if !active.insert(conversation_id.clone()) {
                return Err(DomainError::CallStart(format!(
                    "conversation {} is already in progress",
                    conversation_id
                )));
            }
            gauge!("active_calls").set(active.len() as f64);
        }

        let (publisher, _pump) = spawn_event_pump(session.events.clone());
        publisher.publish(CallEvent::new(
            conversation_id.clone(),
            EventKind::PhoneCallStarted,
            json!({
                "direction": session.direction,
                "to": session.recipient,
                "from": session.caller,
                "carrier": session.telephony.provider(),
            }),
        ));

        info!(
            conversation_id = %conversation_id,
            direction = ?session.direction,
            "Loopback call started"
        );

        tokio::spawn(run_conversation(
            session,
            conversation_id.clone(),
            publisher,
            self.active.clone(),
            self.turn_delay,
        ));

        Ok(CallHandle { conversation_id })
    }
}

async fn run_conversation(
    session: CallSession,
    conversation_id: ConversationId,
    publisher: EventPublisher,
    active: Arc<RwLock<HashSet<ConversationId>>>,
    turn_delay: Duration,
) {
    let emit = |kind: EventKind, payload: serde_json::Value| {
        publisher.publish(CallEvent::new(conversation_id.clone(), kind, payload));
    };

    tokio::time::sleep(turn_delay).await;
    emit(EventKind::PhoneCallConnected, json!({}));

    let greeting = session.config.agent.initial_message.text.clone();
    emit(EventKind::SynthesisComplete, json!({ "text": greeting }));
    emit(EventKind::AgentGeneratedAudio, json!({ "text": greeting }));

    for action in &session.config.agent.actions {
        let invocation = ActionInvocation::new(
            action.action_type.clone(),
            json!({ "bot": greeting, "human": null }),
        )
        .for_conversation(conversation_id.clone());

        run_action(&session.actions, invocation, &emit).await;
    }

    tokio::time::sleep(turn_delay).await;
    emit(EventKind::PhoneCallEnded, json!({ "reason": "completed" }));

    let mut active = active.write().await;
    active.remove(&conversation_id);
    gauge!("active_calls").set(active.len() as f64);
    info!(conversation_id = %conversation_id, "Loopback call ended");
}

async fn run_action(
    registry: &ActionRegistry,
    invocation: ActionInvocation,
    emit: &impl Fn(EventKind, serde_json::Value),
) {
    let action_type = invocation.action_type.clone();
    emit(EventKind::ActionStarted, json!({ "action_type": action_type }));

    match registry.dispatch(invocation).await {
        Ok(result) if result.success => emit(
            EventKind::ActionFinished,
            json!({ "action_type": action_type, "response": result.payload }),
        ),
        Ok(result) => emit(
            EventKind::ActionFailed,
            json!({ "action_type": action_type, "response": result.payload }),
        ),
        Err(e) => {
            warn!("Action {} could not be dispatched: {}", action_type, e);
            emit(
                EventKind::ActionFailed,
                json!({ "action_type": action_type, "error": e.to_string() }),
            );
        }
    }
}
