pub mod ollama;

use crate::domain::error::Result;
use crate::domain::llm_config::LlmConfig;
use async_trait::async_trait;

pub use ollama::OllamaClient;

/// Per-request generation parameters
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub num_predict: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait LLMClient {
    async fn generate(
        &self,
        config: &LlmConfig,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String>;
}
