//! Action handlers and their type-erased descriptors

use super::schema::ActionSchema;
use crate::domain::call::value_object::ActionConfig;
use crate::domain::shared::value_objects::ConversationId;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A side effect the agent may trigger mid-call
///
/// Parameters and response are typed; the registry validates raw payloads
/// against `parameters_schema` before decoding them.
#[async_trait]
pub trait ActionHandler: Send + Sync + 'static {
    type Parameters: DeserializeOwned + Send + 'static;
    type Response: Serialize + Send + 'static;

    /// Unique tag used to route invocations
    fn action_type(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> ActionSchema;

    fn response_schema(&self) -> ActionSchema;

    async fn run(
        &self,
        conversation_id: Option<&ConversationId>,
        parameters: Self::Parameters,
    ) -> Result<Self::Response, String>;
}

/// Why an erased handler did not produce a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HandlerFailure {
    /// Payload passed the schema but could not be decoded
    InvalidParameters(String),
    /// Handler ran and reported an error
    Failed(String),
}

#[async_trait]
pub(crate) trait ErasedHandler: Send + Sync {
    async fn call(
        &self,
        conversation_id: Option<ConversationId>,
        parameters: Value,
    ) -> Result<Value, HandlerFailure>;
}

struct Typed<H>(H);

#[async_trait]
impl<H: ActionHandler> ErasedHandler for Typed<H> {
    async fn call(
        &self,
        conversation_id: Option<ConversationId>,
        parameters: Value,
    ) -> Result<Value, HandlerFailure> {
        let parameters: H::Parameters = serde_json::from_value(parameters)
            .map_err(|e| HandlerFailure::InvalidParameters(e.to_string()))?;

        let response = self
            .0
            .run(conversation_id.as_ref(), parameters)
            .await
            .map_err(HandlerFailure::Failed)?;

        serde_json::to_value(response).map_err(|e| HandlerFailure::Failed(e.to_string()))
    }
}

/// A registered action: tag, description, schemas and handler
#[derive(Clone)]
pub struct ActionDescriptor {
    action_type: String,
    description: String,
    input_schema: ActionSchema,
    output_schema: ActionSchema,
    pub(crate) handler: Arc<dyn ErasedHandler>,
}

impl ActionDescriptor {
    pub fn new<H: ActionHandler>(handler: H) -> Self {
        Self {
            action_type: handler.action_type().to_string(),
            description: handler.description().trim().to_string(),
            input_schema: handler.parameters_schema(),
            output_schema: handler.response_schema(),
            handler: Arc::new(Typed(handler)),
        }
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &ActionSchema {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &ActionSchema {
        &self.output_schema
    }

    /// Declaration handed to the agent config
    pub fn config(&self) -> ActionConfig {
        ActionConfig {
            action_type: self.action_type.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("action_type", &self.action_type)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .field("output_schema", &self.output_schema)
            .finish_non_exhaustive()
    }
}

/// Request from the call engine to run an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInvocation {
    pub action_type: String,
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    pub parameters: Value,
}

impl ActionInvocation {
    pub fn new(action_type: impl Into<String>, parameters: Value) -> Self {
        Self {
            action_type: action_type.into(),
            conversation_id: None,
            parameters,
        }
    }

    pub fn for_conversation(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }
}

/// Outcome of a dispatched action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub action_type: String,
    pub success: bool,
    pub payload: Value,
}

impl ActionResult {
    pub fn succeeded(action_type: &str, payload: Value) -> Self {
        Self {
            action_type: action_type.to_string(),
            success: true,
            payload,
        }
    }

    pub fn failed(action_type: &str, message: impl Into<String>) -> Self {
        Self {
            action_type: action_type.to_string(),
            success: false,
            payload: serde_json::json!({ "error": message.into() }),
        }
    }
}
