//! Call requests accepted from the outside world

use super::value_object::{SynthesizerConfig, TelephonyConfig, TranscriberConfig, TwilioConfig, VonageConfig};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::error::Result;
use crate::domain::shared::value_objects::{ConversationId, PhoneNumber};
use serde::Deserialize;

/// Wire shape of `POST /outbound`
#[derive(Debug, Deserialize)]
struct OutboundCallBody {
    recipient: String,
    caller: String,
    #[serde(default)]
    transcriber_config: Option<TranscriberConfig>,
    #[serde(default)]
    synthesizer_config: Option<SynthesizerConfig>,
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    twilio_config: Option<TwilioConfig>,
    #[serde(default)]
    vonage_config: Option<VonageConfig>,
}

/// A validated outbound call request
#[derive(Debug, Clone)]
pub struct CallRequest {
    recipient: PhoneNumber,
    caller: String,
    transcriber_config: Option<TranscriberConfig>,
    synthesizer_config: Option<SynthesizerConfig>,
    conversation_id: Option<ConversationId>,
    telephony_config: Option<TelephonyConfig>,
}

impl CallRequest {
    /// Parse and validate a raw JSON body.
    ///
    /// Syntax errors and schema violations share one error path.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let body: OutboundCallBody = serde_json::from_slice(body)
            .map_err(|e| DomainError::MalformedRequest(e.to_string()))?;
        Self::validate(body)
    }

    /// Build a request from already-typed parts
    pub fn new(recipient: &str, caller: &str) -> Result<Self> {
        Self::validate(OutboundCallBody {
            recipient: recipient.to_string(),
            caller: caller.to_string(),
            transcriber_config: None,
            synthesizer_config: None,
            conversation_id: None,
            twilio_config: None,
            vonage_config: None,
        })
    }

    fn validate(body: OutboundCallBody) -> Result<Self> {
        let recipient = PhoneNumber::parse(&body.recipient)
            .map_err(|e| DomainError::MalformedRequest(format!("recipient: {}", e)))?;

        let caller = body.caller.trim();
        if caller.is_empty() {
            return Err(DomainError::MalformedRequest(
                "caller must not be empty".to_string(),
            ));
        }

        let conversation_id = match body.conversation_id {
            Some(id) if id.trim().is_empty() => {
                return Err(DomainError::MalformedRequest(
                    "conversation_id must not be empty".to_string(),
                ))
            }
            Some(id) => Some(ConversationId::from_string(id)),
            None => None,
        };

        let telephony_config = match (body.twilio_config, body.vonage_config) {
            (Some(_), Some(_)) => {
                return Err(DomainError::MalformedRequest(
                    "only one of twilio_config or vonage_config may be supplied".to_string(),
                ))
            }
            (Some(twilio), None) => Some(TelephonyConfig::Twilio(twilio)),
            (None, Some(vonage)) => Some(TelephonyConfig::Vonage(vonage)),
            (None, None) => None,
        };

        Ok(Self {
            recipient,
            caller: caller.to_string(),
            transcriber_config: body.transcriber_config,
            synthesizer_config: body.synthesizer_config,
            conversation_id,
            telephony_config,
        })
    }

    pub fn recipient(&self) -> &PhoneNumber {
        &self.recipient
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    pub fn transcriber_config(&self) -> Option<&TranscriberConfig> {
        self.transcriber_config.as_ref()
    }

    pub fn synthesizer_config(&self) -> Option<&SynthesizerConfig> {
        self.synthesizer_config.as_ref()
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    pub fn telephony_config(&self) -> Option<&TelephonyConfig> {
        self.telephony_config.as_ref()
    }
}

/// Carrier webhook announcing an inbound call (Twilio field names)
#[derive(Debug, Clone, Deserialize)]
pub struct InboundCallWebhook {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "CallSid", default)]
    pub call_sid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_request() {
        let req = CallRequest::from_json(
            br#"{"recipient":"+15551234567","caller":"+15559876543"}"#,
        )
        .unwrap();

        assert_eq!(req.recipient().as_str(), "+15551234567");
        assert_eq!(req.caller(), "+15559876543");
        assert!(req.conversation_id().is_none());
        assert!(req.telephony_config().is_none());
        assert!(req.synthesizer_config().is_none());
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let missing_recipient = CallRequest::from_json(br#"{"caller":"+15559876543"}"#);
        assert!(matches!(missing_recipient, Err(DomainError::MalformedRequest(_))));

        let missing_caller = CallRequest::from_json(br#"{"recipient":"+15551234567"}"#);
        assert!(matches!(missing_caller, Err(DomainError::MalformedRequest(_))));

        let wrong_type = CallRequest::from_json(br#"{"recipient":15551234567,"caller":"+1555"}"#);
        assert!(matches!(wrong_type, Err(DomainError::MalformedRequest(_))));
    }

    #[test]
    fn test_bad_json_is_malformed() {
        let result = CallRequest::from_json(b"{not json");
        assert!(matches!(result, Err(DomainError::MalformedRequest(_))));
    }

    #[test]
    fn test_implausible_recipient_is_malformed() {
        let result = CallRequest::from_json(br#"{"recipient":"bob","caller":"+15559876543"}"#);
        assert!(matches!(result, Err(DomainError::MalformedRequest(_))));

        let blank_caller = CallRequest::new("+15551234567", "  ");
        assert!(matches!(blank_caller, Err(DomainError::MalformedRequest(_))));
    }

    #[test]
    fn test_conversation_id_passes_through() {
        let req = CallRequest::from_json(
            br#"{"recipient":"+15551234567","caller":"+15559876543","conversation_id":"  my-id "}"#,
        )
        .unwrap();
        assert_eq!(req.conversation_id().unwrap().as_str(), "  my-id ");

        let empty = CallRequest::from_json(
            br#"{"recipient":"+15551234567","caller":"+15559876543","conversation_id":""}"#,
        );
        assert!(matches!(empty, Err(DomainError::MalformedRequest(_))));
    }

    #[test]
    fn test_carrier_override() {
        let req = CallRequest::from_json(
            br#"{"recipient":"+15551234567","caller":"+15559876543",
                "twilio_config":{"account_sid":"AC1","auth_token":"t"}}"#,
        )
        .unwrap();
        assert_eq!(req.telephony_config().unwrap().provider(), "twilio");

        let both = CallRequest::from_json(
            br#"{"recipient":"+15551234567","caller":"+15559876543",
                "twilio_config":{"account_sid":"AC1","auth_token":"t"},
                "vonage_config":{"api_key":"k","api_secret":"s","application_id":"a","private_key":"p"}}"#,
        );
        assert!(matches!(both, Err(DomainError::MalformedRequest(_))));
    }
}
