use std::path::Path;

use llmapi::utils::detect_mime_type;
use tokio::fs;
use tokio::fs::try_exists;
use tracing::debug;

use crate::constants::DEFAULT_MEDIA_MIME;
use crate::error::{AnalysisError, Result};
use crate::models::MediaPayload;

/// How the declared content type of an upload is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MimePolicy {
    /// Declare every upload as this type regardless of its encoding.
    Fixed(String),
    /// Guess from the file extension, falling back to `image/jpeg`.
    DetectFromExtension,
}

impl Default for MimePolicy {
    fn default() -> Self {
        MimePolicy::Fixed(DEFAULT_MEDIA_MIME.to_string())
    }
}

impl MimePolicy {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "jpeg" | "fixed" => Ok(MimePolicy::default()),
            "detect" | "extension" => Ok(MimePolicy::DetectFromExtension),
            other => Err(AnalysisError::Configuration(format!(
                "Unknown mime policy '{other}', expected 'jpeg' or 'detect'"
            ))),
        }
    }

    pub fn mime_type_for(&self, path: &Path) -> String {
        match self {
            MimePolicy::Fixed(mime) => mime.clone(),
            MimePolicy::DetectFromExtension => detect_mime_type(path),
        }
    }
}

pub async fn load_media(path: impl AsRef<Path>, policy: &MimePolicy) -> Result<MediaPayload> {
    let path = path.as_ref();
    let not_found = || AnalysisError::NotFound {
        path: path.to_path_buf(),
    };

    let exists = try_exists(path).await.map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !exists {
        return Err(not_found());
    }

    let metadata = fs::metadata(path).await.map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    let bytes = fs::read(path).await.map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mime_type = policy.mime_type_for(path);

    debug!(path = %path.display(), %mime_type, len = bytes.len(), "loaded media");
    Ok(MediaPayload::new(mime_type, bytes))
}
