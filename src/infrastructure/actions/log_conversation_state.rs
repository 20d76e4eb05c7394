//! Conversation state logger

use crate::domain::action::{ActionHandler, ActionSchema, FieldSpec, FieldType};
use crate::domain::shared::value_objects::ConversationId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const LOG_CONVERSATION_STATE: &str = "log_conversation_state";

const DESCRIPTION: &str = "Runs any time a new request is made to the agent.";

#[derive(Debug, Clone, Deserialize)]
pub struct LogConversationParameters {
    /// Most recent response from the bot; the key is required, the value may be null
    pub bot: Option<String>,
    /// Most recent utterance from the human
    #[serde(default)]
    pub human: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogConversationResponse {
    pub success: bool,
}

/// Writes the latest bot/human turn to the log. Never fails.
#[derive(Debug, Default)]
pub struct LogConversationState;

impl LogConversationState {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionHandler for LogConversationState {
    type Parameters = LogConversationParameters;
    type Response = LogConversationResponse;

    fn action_type(&self) -> &str {
        LOG_CONVERSATION_STATE
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn parameters_schema(&self) -> ActionSchema {
        ActionSchema::new()
            .with_field(
                FieldSpec::required("bot", FieldType::String, "The most recent response from the bot")
                    .nullable(),
            )
            .with_field(FieldSpec::optional(
                "human",
                FieldType::String,
                "The most recent response from the human",
            ))
    }

    fn response_schema(&self) -> ActionSchema {
        ActionSchema::new().with_field(FieldSpec::required(
            "success",
            FieldType::Boolean,
            "Whether the state was logged",
        ))
    }

    async fn run(
        &self,
        conversation_id: Option<&ConversationId>,
        parameters: LogConversationParameters,
    ) -> Result<LogConversationResponse, String> {
        info!(
            conversation_id = conversation_id.map(ConversationId::as_str),
            bot = parameters.bot.as_deref(),
            human = parameters.human.as_deref(),
            "Conversation state"
        );

        Ok(LogConversationResponse { success: true })
    }
}
