use std::path::{Path, PathBuf};

use llmapi::LLMMessageType;
use serde::Serialize;

use crate::error::AnalysisError;

/// Image bytes plus the content type they are declared as. Built by the media loader,
/// consumed by a single request.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPayload {
    mime_type: String,
    bytes: Vec<u8>,
}

impl MediaPayload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_part(self) -> LLMMessageType {
        LLMMessageType::media(self.mime_type, self.bytes)
    }
}

impl std::fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    pub label: &'static str,
    pub instruction_text: &'static str,
}

#[derive(Debug)]
pub struct AnalysisRequest<'a> {
    pub template: &'a PromptTemplate,
    pub payload: MediaPayload,
}

/// What the upload surface renders: the path it handed in and either the model's text
/// or the error that prevented it.
#[derive(Debug)]
pub struct AnalysisResult {
    pub source_path: PathBuf,
    pub outcome: Result<String, AnalysisError>,
}

impl AnalysisResult {
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn response_text(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        self.outcome.as_ref().err()
    }

    pub fn to_payload(&self) -> AnalysisResultPayload {
        AnalysisResultPayload {
            source_path: self.source_path.display().to_string(),
            response_text: self.response_text().map(str::to_string),
            blocked: self.error().is_some_and(AnalysisError::is_content_blocked),
            error: self.error().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResultPayload {
    pub source_path: String,
    pub response_text: Option<String>,
    pub blocked: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_has_no_response_text() {
        let result = AnalysisResult {
            source_path: PathBuf::from("/tmp/scan.jpg"),
            outcome: Err(AnalysisError::ContentBlocked {
                reason: "SAFETY".into(),
            }),
        };
        assert!(result.response_text().is_none());

        let payload = serde_json::to_value(result.to_payload()).unwrap();
        assert_eq!(payload["sourcePath"], "/tmp/scan.jpg");
        assert!(payload["responseText"].is_null());
        assert_eq!(payload["blocked"], true);
    }

    #[test]
    fn successful_result_exposes_text() {
        let result = AnalysisResult {
            source_path: PathBuf::from("/tmp/scan.jpg"),
            outcome: Ok("Findings: ...".into()),
        };
        assert_eq!(result.response_text(), Some("Findings: ..."));
        let payload = result.to_payload();
        assert!(!payload.blocked);
        assert!(payload.error.is_none());
    }

    #[test]
    fn payload_becomes_media_part() {
        let payload = MediaPayload::new("image/jpeg", vec![1, 2, 3]);
        assert_eq!(payload.len(), 3);
        assert_eq!(
            payload.into_part(),
            LLMMessageType::media("image/jpeg", vec![1, 2, 3])
        );
    }
}
