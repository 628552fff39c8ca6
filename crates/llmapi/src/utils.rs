use base64::Engine as _;
use std::path::Path;

pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

pub fn detect_mime_type<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

pub fn encode_byte_to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
