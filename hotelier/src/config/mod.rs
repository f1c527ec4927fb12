//! Typed runtime configuration, resolved once at startup from the environment.
//!
//! Secrets are required: a missing one aborts startup with [`ConfigError::Missing`].
//! Every other option has a default; a value that does not parse is
//! [`ConfigError::Invalid`]. The `config` crate loads `.env` and the XDG
//! `config.toml` into the environment before [`HotelierConfig::from_env`] runs.

use std::io::Write;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::agent::{AgentOptions, DEFAULT_MAX_STEPS};
use crate::llm::ToolChoiceMode;
use crate::provider::{DEFAULT_AMADEUS_BASE_URL, DEFAULT_EXCHANGE_BASE_URL};

/// Gemini's OpenAI-compatible Chat Completions base URL.
pub const DEFAULT_MODEL_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Reasoning model settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_retries: u32,
    pub timeout: Option<Duration>,
    /// `MODEL_TOOL_CHOICE`; unset leaves the choice to the backend (auto).
    pub tool_choice: Option<ToolChoiceMode>,
}

/// Travel data provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
}

/// Exchange-rate provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Everything `build_session` needs.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelierConfig {
    pub model: ModelConfig,
    pub amadeus: AmadeusConfig,
    pub exchange: ExchangeConfig,
    pub agent: AgentOptions,
    /// Timeout of each provider HTTP request.
    pub http_timeout: Duration,
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Value of `key`, blank counts as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::Invalid { key, value }),
        }
    }

    fn flag(&self, key: &'static str) -> Result<Option<bool>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(Some(true)),
                "0" | "false" | "no" | "off" => Ok(Some(false)),
                _ => Err(ConfigError::Invalid { key, value }),
            },
        }
    }
}

impl HotelierConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup` (the environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let api_key = match env.get("GEMINI_API_KEY") {
            Some(key) => key,
            None => env
                .get("OPENAI_API_KEY")
                .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?,
        };
        let temperature = env
            .parse::<f32>("MODEL_TEMPERATURE")?
            .unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                key: "MODEL_TEMPERATURE",
                value: temperature.to_string(),
            });
        }
        let model = ModelConfig {
            api_key,
            base_url: env.or("MODEL_BASE_URL", DEFAULT_MODEL_BASE_URL),
            model: env.or("MODEL", DEFAULT_MODEL),
            temperature,
            max_retries: env.parse("MODEL_MAX_RETRIES")?.unwrap_or(2),
            timeout: env.parse("MODEL_TIMEOUT_SECS")?.map(Duration::from_secs),
            tool_choice: env.parse("MODEL_TOOL_CHOICE")?,
        };

        let amadeus = AmadeusConfig {
            client_id: env.require("AMADEUS_CLIENT_ID")?,
            client_secret: env.require("AMADEUS_CLIENT_SECRET")?,
            base_url: env.or("AMADEUS_BASE_URL", DEFAULT_AMADEUS_BASE_URL),
        };
        let exchange = ExchangeConfig {
            api_key: env.require("EXCHANGE_API_KEY")?,
            base_url: env.or("EXCHANGE_BASE_URL", DEFAULT_EXCHANGE_BASE_URL),
        };

        let max_steps = env.parse::<u32>("AGENT_MAX_STEPS")?.unwrap_or(DEFAULT_MAX_STEPS);
        if max_steps == 0 {
            return Err(ConfigError::Invalid {
                key: "AGENT_MAX_STEPS",
                value: "0".to_string(),
            });
        }
        let agent = AgentOptions {
            max_steps,
            parallel_tool_calls: env.flag("AGENT_PARALLEL_TOOLS")?.unwrap_or(false),
        };

        Ok(Self {
            model,
            amadeus,
            exchange,
            agent,
            http_timeout: Duration::from_secs(
                env.parse("HTTP_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        })
    }

    /// Key-value pairs for display (no secrets).
    pub fn summary_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("model", self.model.model.clone()),
            ("model_base_url", self.model.base_url.clone()),
            ("temperature", self.model.temperature.to_string()),
            ("max_retries", self.model.max_retries.to_string()),
            (
                "model_timeout",
                self.model
                    .timeout
                    .map(|t| format!("{}s", t.as_secs()))
                    .unwrap_or_else(|| "none".to_string()),
            ),
            (
                "tool_choice",
                self.model
                    .tool_choice
                    .map(|m| format!("{:?}", m).to_lowercase())
                    .unwrap_or_else(|| "auto".to_string()),
            ),
            ("max_steps", self.agent.max_steps.to_string()),
            ("parallel_tools", self.agent.parallel_tool_calls.to_string()),
            ("amadeus_base_url", self.amadeus.base_url.clone()),
            ("exchange_base_url", self.exchange.base_url.clone()),
        ]
    }

    /// Prints `[hotelier config] k=v ...` to stderr. Best-effort.
    pub fn print_summary(&self) {
        let entries: Vec<String> = self
            .summary_entries()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let _ = writeln!(std::io::stderr(), "[hotelier config] {}", entries.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("GEMINI_API_KEY", "g-key"),
        ("AMADEUS_CLIENT_ID", "id"),
        ("AMADEUS_CLIENT_SECRET", "secret"),
        ("EXCHANGE_API_KEY", "x-key"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        REQUIRED.iter().copied().chain(extra.iter().copied()).collect()
    }

    /// **Scenario**: Only the secrets set; everything else takes its default.
    #[test]
    fn from_lookup_applies_defaults() {
        let config = HotelierConfig::from_lookup(lookup(REQUIRED)).unwrap();
        assert_eq!(config.model.api_key, "g-key");
        assert_eq!(config.model.base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(config.model.model, DEFAULT_MODEL);
        assert_eq!(config.model.temperature, 1.0);
        assert_eq!(config.model.max_retries, 2);
        assert_eq!(config.model.timeout, None);
        assert_eq!(config.agent, AgentOptions::default());
        assert_eq!(config.amadeus.base_url, DEFAULT_AMADEUS_BASE_URL);
        assert_eq!(config.exchange.base_url, DEFAULT_EXCHANGE_BASE_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    /// **Scenario**: A missing secret is reported by variable name.
    #[test]
    fn from_lookup_missing_secret_is_fatal() {
        let vars: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "EXCHANGE_API_KEY")
            .collect();
        let err = HotelierConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("EXCHANGE_API_KEY"));
    }

    /// **Scenario**: OPENAI_API_KEY is accepted when GEMINI_API_KEY is blank.
    #[test]
    fn from_lookup_falls_back_to_openai_key() {
        let vars: Vec<_> = REQUIRED
            .iter()
            .copied()
            .map(|(k, v)| if k == "GEMINI_API_KEY" { (k, "  ") } else { (k, v) })
            .chain([("OPENAI_API_KEY", "o-key")])
            .collect();
        let config = HotelierConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.model.api_key, "o-key");
    }

    /// **Scenario**: Overrides are parsed; a bad number names the variable.
    #[test]
    fn from_lookup_parses_overrides_and_rejects_garbage() {
        let config = HotelierConfig::from_lookup(lookup(&with(&[
            ("MODEL", "gemini-2.5-pro"),
            ("MODEL_TEMPERATURE", "0.2"),
            ("MODEL_TIMEOUT_SECS", "45"),
            ("AGENT_MAX_STEPS", "4"),
            ("AGENT_PARALLEL_TOOLS", "yes"),
        ])))
        .unwrap();
        assert_eq!(config.model.model, "gemini-2.5-pro");
        assert_eq!(config.model.temperature, 0.2);
        assert_eq!(config.model.timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.agent.max_steps, 4);
        assert!(config.agent.parallel_tool_calls);

        let err = HotelierConfig::from_lookup(lookup(&with(&[("MODEL_MAX_RETRIES", "many")])))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "MODEL_MAX_RETRIES",
                value: "many".into()
            }
        );
    }

    /// **Scenario**: MODEL_TOOL_CHOICE is optional and validated.
    #[test]
    fn from_lookup_reads_tool_choice() {
        let config = HotelierConfig::from_lookup(lookup(REQUIRED)).unwrap();
        assert_eq!(config.model.tool_choice, None);

        let config =
            HotelierConfig::from_lookup(lookup(&with(&[("MODEL_TOOL_CHOICE", "Required")]))).unwrap();
        assert_eq!(config.model.tool_choice, Some(ToolChoiceMode::Required));
        assert!(config
            .summary_entries()
            .contains(&("tool_choice", "required".to_string())));

        let err = HotelierConfig::from_lookup(lookup(&with(&[("MODEL_TOOL_CHOICE", "always")])))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "MODEL_TOOL_CHOICE",
                value: "always".into()
            }
        );
    }

    /// **Scenario**: The summary never contains secrets.
    #[test]
    fn summary_entries_hide_secrets() {
        let config = HotelierConfig::from_lookup(lookup(REQUIRED)).unwrap();
        let text = format!("{:?}", config.summary_entries());
        for secret in ["g-key", "secret", "x-key"] {
            assert!(!text.contains(secret), "{} leaked", secret);
        }
    }
}
