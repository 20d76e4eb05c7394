//! Outbound call use case: validate, resolve, start, report the handle

use super::config_resolver::ConfigResolver;
use crate::domain::action::ActionRegistry;
use crate::domain::call::engine::{CallEngine, CallHandle, CallSession};
use crate::domain::call::event::EventSink;
use crate::domain::call::request::{CallRequest, InboundCallWebhook};
use crate::domain::call::value_object::{CallDirection, TelephonyConfig};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::error::Result;
use crate::domain::shared::value_objects::ConversationId;
use metrics::counter;
use std::sync::Arc;
use tracing::{error, info};

/// Starts calls on the engine with the process-wide registry and sink
///
/// Holds no per-call state; one instance serves every request.
pub struct OutboundCallOrchestrator {
    resolver: Arc<ConfigResolver>,
    engine: Arc<dyn CallEngine>,
    actions: Arc<ActionRegistry>,
    events: Arc<dyn EventSink>,
    telephony: TelephonyConfig,
}

impl OutboundCallOrchestrator {
    pub fn new(
        resolver: Arc<ConfigResolver>,
        engine: Arc<dyn CallEngine>,
        actions: Arc<ActionRegistry>,
        events: Arc<dyn EventSink>,
        telephony: TelephonyConfig,
    ) -> Self {
        Self {
            resolver,
            engine,
            actions,
            events,
            telephony,
        }
    }

    /// Handle a raw `POST /outbound` body
    pub async fn create_outbound_call(&self, body: &[u8]) -> Result<CallHandle> {
        let request = match CallRequest::from_json(body) {
            Ok(request) => request,
            Err(e) => {
                record_failure(&e);
                return Err(e);
            }
        };
        self.place_call(request).await
    }

    /// Start an outbound call for a validated request.
    ///
    /// Returns once the engine has initiated the call; the conversation keeps
    /// running independently. Nothing is retried.
    pub async fn place_call(&self, request: CallRequest) -> Result<CallHandle> {
        let result = self.start_outbound(request).await;
        match &result {
            Ok(handle) => {
                counter!("outbound_calls_total").increment(1);
                info!(conversation_id = %handle.conversation_id, "Outbound call started");
            }
            Err(e) => record_failure(e),
        }
        result
    }

    async fn start_outbound(&self, request: CallRequest) -> Result<CallHandle> {
        let config = self.resolver.resolve(&request)?;

        let telephony = request
            .telephony_config()
            .cloned()
            .unwrap_or_else(|| self.telephony.clone());

        let session = CallSession {
            direction: CallDirection::Outbound,
            recipient: request.recipient().to_string(),
            caller: request.caller().to_string(),
            conversation_id: request.conversation_id().cloned(),
            config,
            telephony,
            actions: self.actions.clone(),
            events: self.events.clone(),
        };

        info!(
            to = %session.recipient,
            from = %session.caller,
            carrier = session.telephony.provider(),
            "Starting outbound call"
        );

        self.engine.start(session).await.map_err(into_call_start)
    }

    /// Start a conversation for an inbound carrier webhook.
    ///
    /// The carrier's call id, when present, becomes the conversation id.
    pub async fn accept_inbound(&self, webhook: InboundCallWebhook) -> Result<CallHandle> {
        let result = self.start_inbound(webhook).await;
        match &result {
            Ok(handle) => {
                counter!("inbound_calls_total").increment(1);
                info!(conversation_id = %handle.conversation_id, "Inbound call started");
            }
            Err(e) => {
                counter!("inbound_calls_failed", "reason" => e.kind()).increment(1);
                error!("Inbound call failed: {}", e);
            }
        }
        result
    }

    async fn start_inbound(&self, webhook: InboundCallWebhook) -> Result<CallHandle> {
        if webhook.from.trim().is_empty() || webhook.to.trim().is_empty() {
            return Err(DomainError::MalformedRequest(
                "From and To are required".to_string(),
            ));
        }

        let config = self.resolver.resolve_inbound()?;

        let session = CallSession {
            direction: CallDirection::Inbound,
            recipient: webhook.to,
            caller: webhook.from,
            conversation_id: webhook
                .call_sid
                .filter(|sid| !sid.trim().is_empty())
                .map(ConversationId::from_string),
            config,
            telephony: self.telephony.clone(),
            actions: self.actions.clone(),
            events: self.events.clone(),
        };

        info!(from = %session.caller, to = %session.recipient, "Accepting inbound call");

        self.engine.start(session).await.map_err(into_call_start)
    }
}

fn into_call_start(e: DomainError) -> DomainError {
    match e {
        DomainError::CallStart(_) => e,
        other => DomainError::CallStart(other.to_string()),
    }
}

fn record_failure(e: &DomainError) {
    counter!("outbound_calls_failed", "reason" => e.kind()).increment(1);
    error!("Outbound call failed: {}", e);
}
