//! Action registry - routes invocations to handlers by type tag

use super::descriptor::{ActionDescriptor, ActionInvocation, ActionResult, HandlerFailure};
use crate::domain::call::value_object::ActionConfig;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::error::Result;
use futures::FutureExt;
use metrics::counter;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, warn};

/// Catalog of actions available to the agent
///
/// Built once at startup and then shared read-only behind an `Arc`.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionDescriptor>,
    // registration order, so agent configs list actions deterministically
    order: Vec<String>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action. Fails without modifying the registry if the tag is
    /// taken or the descriptor's schemas are malformed.
    pub fn register(&mut self, descriptor: ActionDescriptor) -> Result<()> {
        let action_type = descriptor.action_type().to_string();

        if action_type.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "action type must not be empty".to_string(),
            ));
        }

        if self.actions.contains_key(&action_type) {
            return Err(DomainError::DuplicateAction(action_type));
        }

        descriptor
            .input_schema()
            .check()
            .and_then(|_| descriptor.output_schema().check())
            .map_err(|e| DomainError::ValidationError(format!("{}: {}", action_type, e)))?;

        info!("Registered action {}", action_type);
        self.order.push(action_type.clone());
        self.actions.insert(action_type, descriptor);
        Ok(())
    }

    pub fn get(&self, action_type: &str) -> Option<&ActionDescriptor> {
        self.actions.get(action_type)
    }

    pub fn contains(&self, action_type: &str) -> bool {
        self.actions.contains_key(action_type)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Declarations of every registered action, in registration order
    pub fn action_configs(&self) -> Vec<ActionConfig> {
        self.order
            .iter()
            .filter_map(|t| self.actions.get(t))
            .map(ActionDescriptor::config)
            .collect()
    }

    /// Run the action named by the invocation.
    ///
    /// Unknown tags and non-conforming payloads are errors. Anything that
    /// goes wrong inside the handler, including a panic, comes back as a
    /// failed `ActionResult` instead.
    pub async fn dispatch(&self, invocation: ActionInvocation) -> Result<ActionResult> {
        let descriptor = self
            .actions
            .get(&invocation.action_type)
            .ok_or_else(|| DomainError::UnknownAction(invocation.action_type.clone()))?;

        let action_type = descriptor.action_type();

        descriptor
            .input_schema()
            .validate(&invocation.parameters)
            .map_err(|e| DomainError::ValidationError(format!("{}: {}", action_type, e)))?;

        debug!(
            action_type,
            conversation_id = ?invocation.conversation_id,
            "Dispatching action"
        );

        let outcome = AssertUnwindSafe(
            descriptor
                .handler
                .call(invocation.conversation_id, invocation.parameters),
        )
        .catch_unwind()
        .await;

        let result = match outcome {
            Ok(Ok(payload)) => match descriptor.output_schema().validate(&payload) {
                Ok(()) => ActionResult::succeeded(action_type, payload),
                Err(e) => {
                    warn!("Action {} returned a non-conforming response: {}", action_type, e);
                    ActionResult::failed(action_type, format!("invalid response: {}", e))
                }
            },
            Ok(Err(HandlerFailure::InvalidParameters(e))) => {
                return Err(DomainError::ValidationError(format!("{}: {}", action_type, e)));
            }
            Ok(Err(HandlerFailure::Failed(e))) => {
                warn!("Action {} failed: {}", action_type, e);
                ActionResult::failed(action_type, e)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!("Action {} panicked: {}", action_type, message);
                ActionResult::failed(action_type, format!("handler panicked: {}", message))
            }
        };

        counter!(
            "actions_dispatched_total",
            "action_type" => action_type.to_string(),
            "success" => result.success.to_string()
        )
        .increment(1);

        Ok(result)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
