//! Call value objects

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Call direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    /// Inbound call from a carrier webhook
    Inbound,
    /// Outbound call placed through the API
    Outbound,
}

/// Initial message spoken by the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMessage {
    pub text: String,
}

impl BaseMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Declaration of an action the agent may invoke, attached to the agent config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub action_type: String,
    pub description: String,
}

/// Conversational agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub initial_message: BaseMessage,
    pub prompt_preamble: String,
    pub generate_responses: bool,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

/// Speech synthesis configuration, opaque beyond provider selection
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    pub provider: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl std::fmt::Debug for SynthesizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesizerConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("voice_id", &self.voice_id)
            .field("options", &self.options)
            .finish()
    }
}

/// Speech transcription configuration, opaque beyond provider selection
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriberConfig {
    pub provider: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl std::fmt::Debug for TranscriberConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriberConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("options", &self.options)
            .finish()
    }
}

/// Twilio account credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    #[serde(skip_serializing)]
    pub auth_token: String,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .finish()
    }
}

/// Vonage application credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VonageConfig {
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    pub application_id: String,
    #[serde(skip_serializing)]
    pub private_key: String,
}

impl std::fmt::Debug for VonageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VonageConfig")
            .field("api_key", &self.api_key)
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}

/// Carrier the call engine places the call through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelephonyConfig {
    Twilio(TwilioConfig),
    Vonage(VonageConfig),
}

impl TelephonyConfig {
    pub fn provider(&self) -> &'static str {
        match self {
            TelephonyConfig::Twilio(_) => "twilio",
            TelephonyConfig::Vonage(_) => "vonage",
        }
    }

    /// Whether every credential field is populated
    pub fn has_credentials(&self) -> bool {
        match self {
            TelephonyConfig::Twilio(c) => {
                !c.account_sid.trim().is_empty() && !c.auth_token.trim().is_empty()
            }
            TelephonyConfig::Vonage(c) => {
                !c.api_key.trim().is_empty()
                    && !c.api_secret.trim().is_empty()
                    && !c.application_id.trim().is_empty()
                    && !c.private_key.trim().is_empty()
            }
        }
    }
}

/// Everything a conversation needs, resolved once per call
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCallConfig {
    pub agent: AgentConfig,
    pub synthesizer: SynthesizerConfig,
    pub transcriber: TranscriberConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_are_not_serialized() {
        let twilio = TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
        };
        let json = serde_json::to_value(&twilio).unwrap();
        assert_eq!(json["account_sid"], "AC123");
        assert!(json.get("auth_token").is_none());
        assert!(!format!("{:?}", twilio).contains("secret"));
    }

    #[test]
    fn test_synthesizer_config_keeps_provider_options() {
        let config: SynthesizerConfig = serde_json::from_value(serde_json::json!({
            "provider": "azure",
            "voice_name": "en-US-AriaNeural",
            "rate": 1.1
        }))
        .unwrap();

        assert_eq!(config.provider, "azure");
        assert!(config.api_key.is_none());
        assert_eq!(config.options["voice_name"], "en-US-AriaNeural");
    }

    #[test]
    fn test_telephony_credentials_check() {
        let complete = TelephonyConfig::Twilio(TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
        });
        assert!(complete.has_credentials());
        assert_eq!(complete.provider(), "twilio");

        let blank = TelephonyConfig::Twilio(TwilioConfig {
            account_sid: " ".to_string(),
            auth_token: "token".to_string(),
        });
        assert!(!blank.has_credentials());
    }
}
