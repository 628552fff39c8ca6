use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::LLMError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LLMProvider {
    Gemini,
}

/// One part of a request's content list. Order is preserved on the wire.
#[derive(Clone, PartialEq)]
pub enum LLMMessageType {
    TEXT(String),
    MEDIA { mime_type: String, data: Vec<u8> },
}

impl LLMMessageType {
    pub fn text(text: impl Into<String>) -> Self {
        LLMMessageType::TEXT(text.into())
    }

    pub fn media(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        LLMMessageType::MEDIA {
            mime_type: mime_type.into(),
            data,
        }
    }
}

// Media bytes can be megabytes; print the size instead.
impl fmt::Debug for LLMMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LLMMessageType::TEXT(text) => f.debug_tuple("TEXT").field(text).finish(),
            LLMMessageType::MEDIA { mime_type, data } => f
                .debug_struct("MEDIA")
                .field("mime_type", mime_type)
                .field("len", &data.len())
                .finish(),
        }
    }
}

/// Sampling knobs sent with every request, unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_p: 1.0,
            top_k: 32,
            max_output_tokens: 4096,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    pub fn all(threshold: HarmBlockThreshold) -> Vec<SafetySetting> {
        HarmCategory::ALL
            .into_iter()
            .map(|category| SafetySetting {
                category,
                threshold,
            })
            .collect()
    }
}

/// A single generateContent call: content parts plus the knobs that go with them.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    pub parts: Vec<LLMMessageType>,
    pub generation: GenerationConfig,
    pub safety: Vec<SafetySetting>,
}

#[derive(Clone)]
pub struct LLMClient {
    pub(crate) provider: LLMProvider,
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
}

impl LLMClient {
    pub fn new(
        provider: LLMProvider,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
        }
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

impl fmt::Debug for LLMClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LLMClient")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("default_model", &self.default_model)
            .finish()
    }
}

pub type GenerateFuture = Pin<Box<dyn Future<Output = Result<String, LLMError>> + Send + 'static>>;

pub type GenerateFn = Arc<dyn Fn(GenerateRequest) -> GenerateFuture + Send + Sync>;
