mod api;
pub mod models;
pub use api::{
    build_generate_body, convert_body_parts_gemini, response_to_text_data, send_generate_request,
};

use crate::types::{GenerateFn, GenerateFuture, GenerateRequest, LLMClient};
use std::sync::Arc;
use tracing::debug;

pub fn generate(client: LLMClient) -> GenerateFn {
    Arc::new(move |request: GenerateRequest| -> GenerateFuture {
        let client = client.clone();
        Box::pin(async move {
            let response = send_generate_request(&client, &request).await?;
            debug!(
                response_id = response.response_id.as_deref().unwrap_or("-"),
                model_version = response.model_version.as_deref().unwrap_or("-"),
                candidates = response.candidates.len(),
                "received generateContent response"
            );
            response_to_text_data(&response)
        })
    })
}
