use std::path::PathBuf;

use llmapi::LLMError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Could not find the image: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read image file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend error: {0}")]
    Backend(#[source] LLMError),

    #[error("Response blocked by content safety policy ({reason})")]
    ContentBlocked { reason: String },
}

impl AnalysisError {
    pub fn is_content_blocked(&self) -> bool {
        matches!(self, AnalysisError::ContentBlocked { .. })
    }
}

impl From<LLMError> for AnalysisError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Blocked { reason } => AnalysisError::ContentBlocked { reason },
            other => AnalysisError::Backend(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
