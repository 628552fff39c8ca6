pub const DEFAULT_VISION_MODEL: &str = "gemini-pro-vision";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MEDIA_MIME: &str = "image/jpeg";
pub const DEFAULT_TEMPLATE_LABEL: &str = "neurology-MRI";

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";
pub const TEMPERATURE_ENV: &str = "GEMINI_TEMPERATURE";
pub const TOP_P_ENV: &str = "GEMINI_TOP_P";
pub const TOP_K_ENV: &str = "GEMINI_TOP_K";
pub const MAX_OUTPUT_TOKENS_ENV: &str = "GEMINI_MAX_OUTPUT_TOKENS";
pub const SAFETY_PROFILE_ENV: &str = "SAFETY_PROFILE";
pub const MIME_POLICY_ENV: &str = "MIME_POLICY";
