use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("Backend rejected credentials: status {status} body {body}")]
    Unauthorized { status: StatusCode, body: String },

    #[error("Backend request failed: status {status} body {body}")]
    Http { status: StatusCode, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode Gemini response JSON: {source}. Raw response: {raw}")]
    Decode {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Response blocked by content safety policy: {reason}")]
    Blocked { reason: String },

    #[error("Backend returned no text")]
    EmptyResponse,
}

impl LLMError {
    pub fn is_blocked(&self) -> bool {
        matches!(self, LLMError::Blocked { .. })
    }

    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            LLMError::Unauthorized { status, body }
        } else {
            LLMError::Http { status, body }
        }
    }
}
