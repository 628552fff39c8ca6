use std::str::FromStr;

use llmapi::{GenerationConfig, HarmBlockThreshold, LLMClient, LLMProvider, SafetySetting};
use tracing::debug;

use crate::constants::{
    API_KEY_ENV, DEFAULT_GEMINI_ENDPOINT, DEFAULT_VISION_MODEL, ENDPOINT_ENV,
    MAX_OUTPUT_TOKENS_ENV, MIME_POLICY_ENV, MODEL_ENV, SAFETY_PROFILE_ENV, TEMPERATURE_ENV,
    TOP_K_ENV, TOP_P_ENV,
};
use crate::error::{AnalysisError, Result};
use crate::media::MimePolicy;

/// Content-safety settings sent with each request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SafetyProfile {
    /// Send no settings; the provider's defaults apply.
    #[default]
    ProviderDefault,
    /// Every category at `BLOCK_NONE`.
    Off,
    /// Every category at `BLOCK_MEDIUM_AND_ABOVE`.
    BlockMediumAndAbove,
}

impl SafetyProfile {
    pub fn settings(self) -> Vec<SafetySetting> {
        match self {
            SafetyProfile::ProviderDefault => Vec::new(),
            SafetyProfile::Off => SafetySetting::all(HarmBlockThreshold::BlockNone),
            SafetyProfile::BlockMediumAndAbove => {
                SafetySetting::all(HarmBlockThreshold::BlockMediumAndAbove)
            }
        }
    }
}

impl FromStr for SafetyProfile {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "default" => Ok(SafetyProfile::ProviderDefault),
            "off" | "none" => Ok(SafetyProfile::Off),
            "strict" | "medium" | "block-medium-and-above" => {
                Ok(SafetyProfile::BlockMediumAndAbove)
            }
            other => Err(AnalysisError::Configuration(format!(
                "Unknown safety profile '{other}', expected 'default', 'off' or 'strict'"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub generation: GenerationConfig,
    pub safety: SafetyProfile,
    pub mime_policy: MimePolicy,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("generation", &self.generation)
            .field("safety", &self.safety)
            .field("mime_policy", &self.mime_policy)
            .finish()
    }
}

impl AppConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AnalysisError::Configuration(format!(
                "{API_KEY_ENV} must not be empty"
            )));
        }
        Ok(Self {
            api_key: api_key.trim().to_string(),
            model: DEFAULT_VISION_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            generation: GenerationConfig::default(),
            safety: SafetyProfile::default(),
            mime_policy: MimePolicy::default(),
        })
    }

    /// Loads `.env` when present, then reads the process environment. A missing API key
    /// fails here rather than on the first request.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => {
                return Err(AnalysisError::Configuration(format!(
                    "Failed to load .env: {err}"
                )))
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                AnalysisError::Configuration(format!("{API_KEY_ENV} is not set"))
            })?;

        let mut config = Self::new(api_key)?;
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(model) = non_blank(MODEL_ENV) {
            config.model = model.trim().to_string();
        }
        if let Some(endpoint) = non_blank(ENDPOINT_ENV) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(value) = non_blank(TEMPERATURE_ENV) {
            config.generation.temperature = parse_sampling_knob(TEMPERATURE_ENV, &value)?;
        }
        if let Some(value) = non_blank(TOP_P_ENV) {
            config.generation.top_p = parse_sampling_knob(TOP_P_ENV, &value)?;
        }
        if let Some(value) = non_blank(TOP_K_ENV) {
            config.generation.top_k = parse_var(TOP_K_ENV, &value)?;
        }
        if let Some(value) = non_blank(MAX_OUTPUT_TOKENS_ENV) {
            config.generation.max_output_tokens = parse_var(MAX_OUTPUT_TOKENS_ENV, &value)?;
        }
        if let Some(value) = non_blank(SAFETY_PROFILE_ENV) {
            config.safety = value.parse()?;
        }
        if let Some(value) = non_blank(MIME_POLICY_ENV) {
            config.mime_policy = MimePolicy::parse(&value)?;
        }

        Ok(config)
    }

    pub fn client(&self) -> LLMClient {
        LLMClient::new(
            LLMProvider::Gemini,
            self.api_key.clone(),
            self.endpoint.clone(),
            self.model.clone(),
        )
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AnalysisError::Configuration(format!("{key} has an invalid value '{value}'"))
    })
}

// NaN and infinity serialise as JSON null, which the backend would read as "unset".
fn parse_sampling_knob(key: &str, value: &str) -> Result<f64> {
    let parsed: f64 = parse_var(key, value)?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(AnalysisError::Configuration(format!(
            "{key} must be a finite, non-negative number, got '{value}'"
        )));
    }
    Ok(parsed)
}
