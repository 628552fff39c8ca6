pub mod gemini;

use crate::types::{GenerateFn, LLMClient, LLMProvider};

pub use gemini::{build_generate_body, generate as gemini_generate, send_generate_request};

pub fn get_llm_generate(client: LLMClient) -> GenerateFn {
    match client.provider() {
        LLMProvider::Gemini => gemini_generate(client),
    }
}
