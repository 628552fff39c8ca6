pub mod error;
pub mod providers;
pub mod types;
pub mod utils;

pub use error::LLMError;
pub use providers::get_llm_generate;
pub use types::{
    GenerateFn, GenerateFuture, GenerateRequest, GenerationConfig, HarmBlockThreshold,
    HarmCategory, LLMClient, LLMMessageType, LLMProvider, SafetySetting,
};
