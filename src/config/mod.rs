//! Configuration management
//!
//! Everything is read once from the process environment at startup.

use crate::domain::call::value_object::{
    SynthesizerConfig, TelephonyConfig, TranscriberConfig, TwilioConfig,
};
use config::{ConfigError, Environment};
use sentry::types::Dsn;
use sentry::ClientOptions;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub telephony: TelephonySettings,
    pub telemetry: TelemetryConfig,
    pub metrics: MetricsConfig,
    pub prompts: PromptsConfig,
    pub synthesizer: SynthesizerSettings,
    pub transcriber: TranscriberSettings,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public URL the carrier reaches this server on
    pub base_url: String,
}

#[derive(Clone)]
pub struct TelephonySettings {
    pub account_sid: String,
    pub auth_token: String,
}

impl fmt::Debug for TelephonySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelephonySettings")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .finish()
    }
}

/// Error reporting, switched on by `USE_SENTRY`
#[derive(Clone)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub dsn: Option<Dsn>,
    pub environment: Option<String>,
}

impl TelemetryConfig {
    /// Sentry client options, or `None` when error reporting is off
    pub fn client_options(&self) -> Option<ClientOptions> {
        if !self.enabled {
            return None;
        }

        Some(ClientOptions {
            dsn: self.dsn.clone(),
            environment: self.environment.clone().map(Into::into),
            release: sentry::release_name!(),
            traces_sample_rate: 1.0,
            ..Default::default()
        })
    }
}

impl fmt::Debug for TelemetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryConfig")
            .field("enabled", &self.enabled)
            .field("dsn", &self.dsn.as_ref().map(|_| "***"))
            .field("environment", &self.environment)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Mount `GET /metrics` with the Prometheus exporter
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct PromptsConfig {
    pub dir: PathBuf,
}

#[derive(Clone)]
pub struct SynthesizerSettings {
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
}

impl fmt::Debug for SynthesizerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizerSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("voice_id", &self.voice_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct TranscriberSettings {
    pub api_key: Option<String>,
}

impl fmt::Debug for TranscriberSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriberSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Flat view of the environment variables we read
#[derive(Debug, Deserialize)]
struct EnvSettings {
    base_url: String,
    host: String,
    port: u16,
    twilio_account_sid: String,
    twilio_auth_token: String,
    use_sentry: bool,
    sentry_dsn: Option<String>,
    environment: Option<String>,
    metrics_enabled: bool,
    prompts_dir: String,
    eleven_labs_api_key: Option<String>,
    eleven_labs_voice_id: Option<String>,
    deepgram_api_key: Option<String>,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(source: Environment) -> Result<Self, ConfigError> {
        let settings: EnvSettings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("use_sentry", false)?
            .set_default("metrics_enabled", false)?
            .set_default("prompts_dir", "./prompts")?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        for (name, value) in [
            ("BASE_URL", &settings.base_url),
            ("TWILIO_ACCOUNT_SID", &settings.twilio_account_sid),
            ("TWILIO_AUTH_TOKEN", &settings.twilio_auth_token),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{} must not be empty", name)));
            }
        }

        let dsn = non_empty(settings.sentry_dsn)
            .map(|dsn| {
                dsn.parse::<Dsn>()
                    .map_err(|e| ConfigError::Message(format!("SENTRY_DSN is invalid: {}", e)))
            })
            .transpose()?;

        Ok(Self {
            server: ServerConfig {
                host: settings.host,
                port: settings.port,
                base_url: settings.base_url,
            },
            telephony: TelephonySettings {
                account_sid: settings.twilio_account_sid,
                auth_token: settings.twilio_auth_token,
            },
            telemetry: TelemetryConfig {
                enabled: settings.use_sentry,
                dsn,
                environment: non_empty(settings.environment),
            },
            metrics: MetricsConfig {
                enabled: settings.metrics_enabled,
            },
            prompts: PromptsConfig {
                dir: PathBuf::from(settings.prompts_dir),
            },
            synthesizer: SynthesizerSettings {
                api_key: non_empty(settings.eleven_labs_api_key),
                voice_id: non_empty(settings.eleven_labs_voice_id),
            },
            transcriber: TranscriberSettings {
                api_key: non_empty(settings.deepgram_api_key),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Default carrier for calls that do not bring their own
    pub fn telephony_config(&self) -> TelephonyConfig {
        TelephonyConfig::Twilio(TwilioConfig {
            account_sid: self.telephony.account_sid.clone(),
            auth_token: self.telephony.auth_token.clone(),
        })
    }

    /// Default synthesizer: ElevenLabs
    pub fn synthesizer_config(&self) -> SynthesizerConfig {
        SynthesizerConfig {
            provider: "eleven_labs".to_string(),
            api_key: self.synthesizer.api_key.clone(),
            voice_id: self.synthesizer.voice_id.clone(),
            options: Map::<String, Value>::new(),
        }
    }

    /// Default transcriber: Deepgram
    pub fn transcriber_config(&self) -> TranscriberConfig {
        TranscriberConfig {
            provider: "deepgram".to_string(),
            api_key: self.transcriber.api_key.clone(),
            options: Map::<String, Value>::new(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("BASE_URL", "calls.example.com"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "secret-token"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&required())).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.base_url, "calls.example.com");
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(!config.telemetry.enabled);
        assert!(config.telemetry.dsn.is_none());
        assert!(config.telemetry.client_options().is_none());
        assert!(!config.metrics.enabled);
        assert_eq!(config.prompts.dir, PathBuf::from("./prompts"));
        assert_eq!(config.telephony_config().provider(), "twilio");
        assert!(config.synthesizer_config().api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = required();
        pairs.extend([
            ("PORT", "8088"),
            ("USE_SENTRY", "true"),
            ("SENTRY_DSN", "https://key@errors.example.com/1"),
            ("METRICS_ENABLED", "true"),
            ("PROMPTS_DIR", "/etc/outdial/prompts"),
            ("ELEVEN_LABS_API_KEY", "el-key"),
            ("ELEVEN_LABS_VOICE_ID", "voice-1"),
            ("DEEPGRAM_API_KEY", ""),
        ]);
        let config = Config::from_vars(vars(&pairs)).unwrap();

        assert_eq!(config.server.port, 8088);
        assert!(config.telemetry.enabled);
        assert!(config.metrics.enabled);
        let dsn = config.telemetry.dsn.as_ref().unwrap();
        assert_eq!(dsn.public_key(), "key");
        assert_eq!(dsn.host(), "errors.example.com");
        assert_eq!(config.prompts.dir, PathBuf::from("/etc/outdial/prompts"));
        assert_eq!(config.synthesizer_config().voice_id.as_deref(), Some("voice-1"));
        assert!(config.transcriber_config().api_key.is_none());
    }

    #[test]
    fn test_missing_required_variables() {
        let result = Config::from_vars(vars(&[("BASE_URL", "calls.example.com")]));
        assert!(result.is_err());

        let mut blank = required();
        blank[2] = ("TWILIO_AUTH_TOKEN", " ");
        assert!(Config::from_vars(vars(&blank)).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut pairs = required();
        pairs.extend([
            ("SENTRY_DSN", "https://PUBLICKEY@o1.ingest.sentry.io/42"),
            ("ELEVEN_LABS_API_KEY", "el-secret"),
        ]);
        let config = Config::from_vars(vars(&pairs)).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("secret-token"));
        assert!(!debug.contains("PUBLICKEY"));
        assert!(!debug.contains("el-secret"));
        assert!(config.telemetry.dsn.is_some());
    }

    #[test]
    fn test_sentry_client_options() {
        let mut pairs = required();
        pairs.extend([
            ("USE_SENTRY", "true"),
            ("SENTRY_DSN", "https://key@o1.ingest.sentry.io/42"),
            ("ENVIRONMENT", "staging"),
        ]);
        let config = Config::from_vars(vars(&pairs)).unwrap();
        let options = config.telemetry.client_options().unwrap();

        assert_eq!(
            options.dsn.as_ref().map(|d| d.project_id().to_string()).as_deref(),
            Some("42")
        );
        assert_eq!(options.environment.as_deref(), Some("staging"));
        assert_eq!(options.traces_sample_rate, 1.0);
    }

    #[test]
    fn test_invalid_sentry_dsn_is_rejected() {
        let mut pairs = required();
        pairs.push(("SENTRY_DSN", "not a dsn"));
        assert!(Config::from_vars(vars(&pairs)).is_err());
    }
}
