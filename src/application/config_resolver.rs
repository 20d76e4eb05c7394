//! Resolves the agent, synthesizer and transcriber configuration for a call

use crate::domain::call::request::CallRequest;
use crate::domain::call::value_object::{
    ActionConfig, AgentConfig, BaseMessage, CallDirection, ResolvedCallConfig, SynthesizerConfig,
    TranscriberConfig,
};
use crate::domain::shared::error::Result;
use crate::infrastructure::prompts::PromptLibrary;

pub struct ConfigResolver {
    prompts: PromptLibrary,
    synthesizer: SynthesizerConfig,
    transcriber: TranscriberConfig,
    actions: Vec<ActionConfig>,
}

impl ConfigResolver {
    /// `synthesizer` and `transcriber` are the process defaults; `actions`
    /// is attached to every outbound agent.
    pub fn new(
        prompts: PromptLibrary,
        synthesizer: SynthesizerConfig,
        transcriber: TranscriberConfig,
        actions: Vec<ActionConfig>,
    ) -> Self {
        Self {
            prompts,
            synthesizer,
            transcriber,
            actions,
        }
    }

    /// Configuration for an outbound call.
    ///
    /// Request-level synthesizer/transcriber blocks replace the defaults.
    pub fn resolve(&self, request: &CallRequest) -> Result<ResolvedCallConfig> {
        let template = self.prompts.template(CallDirection::Outbound)?;

        let agent = AgentConfig {
            initial_message: BaseMessage::new(template.initial_message()),
            prompt_preamble: template.prompt_preamble().to_string(),
            generate_responses: true,
            actions: self.actions.clone(),
        };

        Ok(ResolvedCallConfig {
            agent,
            synthesizer: request
                .synthesizer_config()
                .cloned()
                .unwrap_or_else(|| self.synthesizer.clone()),
            transcriber: request
                .transcriber_config()
                .cloned()
                .unwrap_or_else(|| self.transcriber.clone()),
        })
    }

    /// Configuration for calls arriving through the inbound webhook
    pub fn resolve_inbound(&self) -> Result<ResolvedCallConfig> {
        let template = self.prompts.template(CallDirection::Inbound)?;

        Ok(ResolvedCallConfig {
            agent: AgentConfig {
                initial_message: BaseMessage::new(template.initial_message()),
                prompt_preamble: template.prompt_preamble().to_string(),
                generate_responses: true,
                actions: Vec::new(),
            },
            synthesizer: self.synthesizer.clone(),
            transcriber: self.transcriber.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::error::DomainError;
    use crate::infrastructure::prompts::PromptTemplate;
    use serde_json::Map;

    fn synthesizer(provider: &str) -> SynthesizerConfig {
        SynthesizerConfig {
            provider: provider.to_string(),
            api_key: Some("key".to_string()),
            voice_id: None,
            options: Map::new(),
        }
    }

    fn transcriber(provider: &str) -> TranscriberConfig {
        TranscriberConfig {
            provider: provider.to_string(),
            api_key: None,
            options: Map::new(),
        }
    }

    fn resolver() -> ConfigResolver {
        let outbound = PromptTemplate::parse(
            "<p><initial_message>\n  Hello from Acme!  \n</initial_message>\
             <prompt_preamble>  You are a sales agent.\n</prompt_preamble></p>",
        )
        .unwrap();
        let inbound = PromptTemplate::parse(
            "<p><initial_message>Thanks for calling.</initial_message>\
             <prompt_preamble>You answer support calls.</prompt_preamble></p>",
        )
        .unwrap();

        ConfigResolver::new(
            PromptLibrary::with_templates(inbound, outbound),
            synthesizer("eleven_labs"),
            transcriber("deepgram"),
            vec![ActionConfig {
                action_type: "log_conversation_state".to_string(),
                description: "logs".to_string(),
            }],
        )
    }

    #[test]
    fn test_resolve_uses_trimmed_template_text() {
        let request = CallRequest::new("+15551234567", "+15559876543").unwrap();
        let config = resolver().resolve(&request).unwrap();

        assert_eq!(config.agent.initial_message.text, "Hello from Acme!");
        assert_eq!(config.agent.prompt_preamble, "You are a sales agent.");
        assert!(config.agent.generate_responses);
        assert_eq!(config.agent.actions.len(), 1);
        assert_eq!(config.synthesizer.provider, "eleven_labs");
        assert_eq!(config.transcriber.provider, "deepgram");
    }

    #[test]
    fn test_request_overrides_replace_defaults() {
        let request = CallRequest::from_json(
            br#"{"recipient":"+15551234567","caller":"+15559876543",
                "synthesizer_config":{"provider":"azure","voice_name":"aria"},
                "transcriber_config":{"provider":"whisper"}}"#,
        )
        .unwrap();
        let config = resolver().resolve(&request).unwrap();

        assert_eq!(config.synthesizer.provider, "azure");
        assert_eq!(config.synthesizer.options["voice_name"], "aria");
        assert_eq!(config.transcriber.provider, "whisper");
        // request untouched
        assert_eq!(request.synthesizer_config().unwrap().provider, "azure");
    }

    #[test]
    fn test_inbound_config_has_no_actions() {
        let config = resolver().resolve_inbound().unwrap();
        assert_eq!(config.agent.initial_message.text, "Thanks for calling.");
        assert!(config.agent.actions.is_empty());
    }

    #[test]
    fn test_missing_template_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ConfigResolver::new(
            PromptLibrary::new(dir.path()),
            synthesizer("eleven_labs"),
            transcriber("deepgram"),
            Vec::new(),
        );
        let request = CallRequest::new("+15551234567", "+15559876543").unwrap();

        let result = resolver.resolve(&request);
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}
