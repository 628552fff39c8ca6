use std::path::Path;

use llmapi::{get_llm_generate, GenerateFn, GenerateRequest, GenerationConfig, LLMMessageType};
use tracing::{info, warn};

use crate::config::{AppConfig, SafetyProfile};
use crate::error::Result;
use crate::media::{load_media, MimePolicy};
use crate::models::{AnalysisRequest, AnalysisResult, PromptTemplate};

/// Pairs an instruction template with an uploaded image and asks the backend once.
/// Holds only read-only settings, so one pipeline can serve concurrent uploads.
#[derive(Clone)]
pub struct AnalysisPipeline {
    backend: GenerateFn,
    generation: GenerationConfig,
    safety: SafetyProfile,
    mime_policy: MimePolicy,
}

impl AnalysisPipeline {
    pub fn new(
        backend: GenerateFn,
        generation: GenerationConfig,
        safety: SafetyProfile,
        mime_policy: MimePolicy,
    ) -> Self {
        Self {
            backend,
            generation,
            safety,
            mime_policy,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            get_llm_generate(config.client()),
            config.generation,
            config.safety,
            config.mime_policy.clone(),
        )
    }

    /// Returns the backend's text verbatim. The media is loaded before anything is sent,
    /// so a missing file never reaches the backend.
    pub async fn analyze(
        &self,
        template: &PromptTemplate,
        path: impl AsRef<Path>,
    ) -> Result<String> {
        let path = path.as_ref();
        let payload = load_media(path, &self.mime_policy).await?;
        let request = AnalysisRequest { template, payload };

        info!(
            template = request.template.label,
            path = %path.display(),
            mime_type = request.payload.mime_type(),
            bytes = request.payload.len(),
            safety = ?self.safety,
            "submitting analysis request"
        );

        let response = (self.backend)(self.build_request(request)).await;
        match response {
            Ok(text) => {
                info!(template = template.label, chars = text.len(), "analysis complete");
                Ok(text)
            }
            Err(err) => {
                warn!(template = template.label, error = %err, "analysis failed");
                Err(err.into())
            }
        }
    }

    /// Upload contract: only the first file is analysed; no files means nothing to show.
    pub async fn process_upload<P: AsRef<Path>>(
        &self,
        template: &PromptTemplate,
        files: &[P],
    ) -> Option<AnalysisResult> {
        let first = files.first()?.as_ref();
        if files.len() > 1 {
            warn!(
                ignored = files.len() - 1,
                "multiple files uploaded, analysing only the first"
            );
        }

        let outcome = self.analyze(template, first).await;
        Some(AnalysisResult {
            source_path: first.to_path_buf(),
            outcome,
        })
    }

    fn build_request(&self, request: AnalysisRequest<'_>) -> GenerateRequest {
        GenerateRequest {
            parts: vec![
                LLMMessageType::text(request.template.instruction_text),
                request.payload.into_part(),
            ],
            generation: self.generation,
            safety: self.safety.settings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::prompts;
    use llmapi::{GenerateFuture, HarmBlockThreshold, LLMError};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn forbidden() -> LLMError {
        LLMError::Unauthorized {
            status: 403u16.try_into().unwrap(),
            body: "API key not valid".into(),
        }
    }

    type Seen = Arc<Mutex<Vec<GenerateRequest>>>;

    fn fake_backend(reply: fn() -> std::result::Result<String, LLMError>) -> (GenerateFn, Seen) {
        let seen: Seen = Arc::default();
        let recorder = seen.clone();
        let backend: GenerateFn = Arc::new(move |request: GenerateRequest| -> GenerateFuture {
            recorder.lock().unwrap().push(request);
            Box::pin(async move { reply() })
        });
        (backend, seen)
    }

    fn pipeline(backend: GenerateFn, safety: SafetyProfile) -> AnalysisPipeline {
        AnalysisPipeline::new(
            backend,
            GenerationConfig::default(),
            safety,
            MimePolicy::default(),
        )
    }

    fn scan_file(len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&vec![0xAB; len]).unwrap();
        file
    }

    #[tokio::test]
    async fn sends_instruction_then_payload_in_one_request() {
        let (backend, seen) = fake_backend(|| Ok("Findings: ...".to_string()));
        let pipeline = pipeline(backend, SafetyProfile::ProviderDefault);
        let template = prompts::lookup("neurology-MRI").unwrap();
        let file = scan_file(12288);

        let text = pipeline.analyze(template, file.path()).await.unwrap();
        assert_eq!(text, "Findings: ...");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let parts = &seen[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], LLMMessageType::text(template.instruction_text));
        assert_eq!(parts[1], LLMMessageType::media("image/jpeg", vec![0xAB; 12288]));
        assert_eq!(seen[0].generation, GenerationConfig::default());
        assert!(seen[0].safety.is_empty());
    }

    #[tokio::test]
    async fn missing_file_never_reaches_backend() {
        let (backend, seen) = fake_backend(|| Ok("unused".to_string()));
        let pipeline = pipeline(backend, SafetyProfile::ProviderDefault);
        let template = prompts::lookup("dentistry").unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = pipeline
            .analyze(template, dir.path().join("missing.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound { .. }));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn authorization_failure_is_backend_error_without_text() {
        let (backend, seen) = fake_backend(|| Err(forbidden()));
        let pipeline = pipeline(backend, SafetyProfile::ProviderDefault);
        let template = prompts::lookup("neurology-MRI").unwrap();
        let file = scan_file(16);

        let result = pipeline
            .process_upload(template, &[file.path()])
            .await
            .unwrap();
        assert_eq!(result.source_path(), file.path());
        assert!(result.response_text().is_none());
        assert!(matches!(
            result.error(),
            Some(AnalysisError::Backend(LLMError::Unauthorized { .. }))
        ));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn safety_rejection_is_content_blocked() {
        let (backend, _) = fake_backend(|| {
            Err(LLMError::Blocked {
                reason: "SAFETY".into(),
            })
        });
        let pipeline = pipeline(backend, SafetyProfile::BlockMediumAndAbove);
        let template = prompts::lookup("neurology-MRI").unwrap();
        let file = scan_file(16);

        let err = pipeline.analyze(template, file.path()).await.unwrap_err();
        assert!(err.is_content_blocked());
        assert!(!matches!(err, AnalysisError::Backend(_)));
    }

    #[tokio::test]
    async fn selected_safety_profile_is_sent() {
        let (backend, seen) = fake_backend(|| Ok(String::new()));
        let pipeline = pipeline(backend, SafetyProfile::BlockMediumAndAbove);
        let template = prompts::lookup("plant-pathology").unwrap();
        let file = scan_file(4);

        pipeline.analyze(template, file.path()).await.unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].safety.len(), 4);
        assert!(seen[0]
            .safety
            .iter()
            .all(|s| s.threshold == HarmBlockThreshold::BlockMediumAndAbove));
    }

    #[tokio::test]
    async fn upload_uses_only_first_file() {
        let (backend, seen) = fake_backend(|| Ok("ok".to_string()));
        let pipeline = pipeline(backend, SafetyProfile::ProviderDefault);
        let template = prompts::lookup("dentistry").unwrap();
        let first = scan_file(3);
        let second = scan_file(5);

        let result = pipeline
            .process_upload(template, &[first.path(), second.path()])
            .await
            .unwrap();
        assert_eq!(result.source_path(), first.path());
        assert_eq!(result.response_text(), Some("ok"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].parts[1], LLMMessageType::media("image/jpeg", vec![0xAB; 3]));
    }

    #[tokio::test]
    async fn empty_upload_produces_nothing() {
        let (backend, seen) = fake_backend(|| Ok("unused".to_string()));
        let pipeline = pipeline(backend, SafetyProfile::ProviderDefault);
        let template = prompts::lookup("dentistry").unwrap();
        let files: [&Path; 0] = [];

        assert!(pipeline.process_upload(template, &files).await.is_none());
        assert!(seen.lock().unwrap().is_empty());
    }
}
