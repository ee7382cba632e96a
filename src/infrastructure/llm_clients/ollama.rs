use super::{GenerateOptions, LLMClient};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LlmConfig;
use async_trait::async_trait;
use serde_json::json;

pub struct OllamaClient {
    client: reqwest::Client,
}

impl OllamaClient {
    /// Build a client bound by the configured request timeout; the
    /// timeout covers the whole generation call
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

fn request_body(config: &LlmConfig, prompt: &str, options: &GenerateOptions) -> serde_json::Value {
    json!({
        "model": config.model,
        "prompt": prompt,
        "stream": false,
        "options": {
            "num_predict": options.num_predict,
            "temperature": options.temperature,
        },
    })
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(
        &self,
        config: &LlmConfig,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String> {
        let base_url = config.base_url.trim_end_matches('/');
        let url = format!("{}/api/generate", base_url);

        let body = request_body(config, prompt, options);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::LLMError(format!(
                        "Timeout after {}s waiting for the model",
                        config.timeout_secs
                    ))
                } else {
                    AppError::LLMError(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        // A reply without the field counts as an empty generation
        Ok(json["response"].as_str().unwrap_or("").trim().to_string())
    }
}
