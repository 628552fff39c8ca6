use reqwest::Client;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::error::LLMError;
use crate::types::{GenerateRequest, LLMClient, LLMMessageType};
use crate::utils::encode_byte_to_base64;

use super::models::GeminiResponse;

const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

pub fn convert_body_parts_gemini(body_part: &[LLMMessageType]) -> Vec<Value> {
    body_part
        .iter()
        .map(|part| match part {
            LLMMessageType::TEXT(text) => json!({ "text": text }),
            LLMMessageType::MEDIA { mime_type, data } => json!({
                "inlineData": {
                    "mimeType": mime_type,
                    "data": encode_byte_to_base64(data)
                }
            }),
        })
        .collect()
}

/// Builds the generateContent body. `safetySettings` is left out entirely when the
/// request carries none, so the provider's own defaults apply.
pub fn build_generate_body(request: &GenerateRequest) -> Value {
    let mut body = Map::new();
    body.insert(
        "contents".into(),
        json!([{
            "role": "user",
            "parts": convert_body_parts_gemini(&request.parts)
        }]),
    );
    body.insert("generationConfig".into(), json!(request.generation));
    if !request.safety.is_empty() {
        body.insert("safetySettings".into(), json!(request.safety));
    }
    Value::Object(body)
}

fn generate_url(api_client: &LLMClient) -> String {
    let endpoint = api_client.endpoint().trim_end_matches('/');
    let model = api_client.default_model();
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("{}/{}:generateContent", endpoint, model)
}

pub async fn send_generate_request(
    api_client: &LLMClient,
    request: &GenerateRequest,
) -> Result<GeminiResponse, LLMError> {
    let url = generate_url(api_client);
    let body = build_generate_body(request);

    debug!(
        %url,
        parts = request.parts.len(),
        safety_settings = request.safety.len(),
        "sending generateContent request"
    );

    let client = Client::new();
    let response = client
        .post(&url)
        .header("x-goog-api-key", api_client.api_key())
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        warn!(%status, "generateContent returned non-success status");
        return Err(LLMError::from_status(status, response_text));
    }

    serde_json::from_str(&response_text).map_err(|source| LLMError::Decode {
        source,
        raw: response_text,
    })
}

/// Returns the text of the first candidate, verbatim. Safety refusals are reported as
/// `LLMError::Blocked` before any text is looked at.
pub fn response_to_text_data(response: &GeminiResponse) -> Result<String, LLMError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_ref())
    {
        return Err(LLMError::Blocked {
            reason: reason.clone(),
        });
    }

    let candidate = response.candidates.first().ok_or(LLMError::EmptyResponse)?;

    if let Some(reason) = candidate
        .finish_reason
        .as_deref()
        .filter(|reason| BLOCKING_FINISH_REASONS.contains(reason))
    {
        return Err(LLMError::Blocked {
            reason: reason.to_string(),
        });
    }

    let texts: Vec<&str> = candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .collect();

    if texts.is_empty() {
        return Err(LLMError::EmptyResponse);
    }

    Ok(texts.concat())
}
