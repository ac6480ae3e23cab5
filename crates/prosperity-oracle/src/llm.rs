//! Text backends for turn resolution.
//!
//! Enum dispatch over the two wire formats the oracle speaks: the
//! OpenAI-compatible chat completions API (also served by `DeepSeek` and
//! Ollama) and the Anthropic Messages API. Both receive the same rendered
//! prompt and response schema; both return the raw text of the first
//! content block for the parser to deal with.

use serde_json::Value;

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::OracleClientError;
use crate::prompt::RenderedPrompt;
use crate::schema::SCHEMA_NAME;

/// Sampling parameters shared by every call.
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token budget.
    pub max_tokens: u32,
}

/// An LLM backend that turns a prompt into response text.
///
/// Uses enum dispatch instead of trait objects because async methods
/// are not dyn-compatible in Rust.
#[derive(Debug)]
pub enum LlmBackend {
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Send a prompt constrained by `schema` and return the response text.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::LlmBackend`] if the HTTP call fails or
    /// the response carries no text.
    pub async fn complete(
        &self,
        prompt: &RenderedPrompt,
        schema: &Value,
        sampling: Sampling,
    ) -> Result<String, OracleClientError> {
        match self {
            Self::OpenAi(backend) => backend.complete(prompt, schema, sampling).await,
            Self::Anthropic(backend) => backend.complete(prompt, schema, sampling).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }

    /// Model identifier for logging.
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi(b) => &b.model,
            Self::Anthropic(b) => &b.model,
        }
    }
}

/// Backend for OpenAI-compatible chat completions APIs.
///
/// Sends requests to `{api_url}/chat/completions` with a strict
/// `json_schema` response format.
#[derive(Debug)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a new `OpenAI`-compatible backend.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn request_body(&self, prompt: &RenderedPrompt, schema: &Value, sampling: Sampling) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": sampling.temperature,
            "max_tokens": sampling.max_tokens,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": schema,
                }
            }
        })
    }

    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        schema: &Value,
        sampling: Sampling,
    ) -> Result<String, OracleClientError> {
        let url = format!("{}/chat/completions", self.api_url);
        let body = self.request_body(prompt, schema, sampling);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleClientError::LlmBackend(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(OracleClientError::LlmBackend(format!(
                "OpenAI returned {status}: {error_body}"
            )));
        }

        let json: Value = response.json().await.map_err(|e| {
            OracleClientError::LlmBackend(format!("OpenAI response parse failed: {e}"))
        })?;

        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
pub fn extract_openai_content(json: &Value) -> Result<String, OracleClientError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            OracleClientError::LlmBackend(
                "OpenAI response missing choices[0].message.content".to_owned(),
            )
        })
}

/// Backend for the Anthropic Messages API.
///
/// The Messages API has no schema-constrained output, so the schema is
/// appended to the system prompt and the parser's recovery strategies
/// handle any drift.
#[derive(Debug)]
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    /// Create a new Anthropic Messages API backend.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn request_body(&self, prompt: &RenderedPrompt, schema: &Value, sampling: Sampling) -> Value {
        let system = format!(
            "{}\n\n只输出一个符合以下 JSON Schema 的 JSON 对象，不要输出任何其他内容：\n{schema}",
            prompt.system
        );
        serde_json::json!({
            "model": self.model,
            "max_tokens": sampling.max_tokens,
            "temperature": sampling.temperature,
            "system": system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        })
    }

    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        schema: &Value,
        sampling: Sampling,
    ) -> Result<String, OracleClientError> {
        let url = format!("{}/messages", self.api_url);
        let body = self.request_body(prompt, schema, sampling);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleClientError::LlmBackend(format!("Anthropic request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(OracleClientError::LlmBackend(format!(
                "Anthropic returned {status}: {error_body}"
            )));
        }

        let json: Value = response.json().await.map_err(|e| {
            OracleClientError::LlmBackend(format!("Anthropic response parse failed: {e}"))
        })?;

        extract_anthropic_content(&json)
    }
}

/// Extract the text content from an Anthropic Messages API response.
pub fn extract_anthropic_content(json: &Value) -> Result<String, OracleClientError> {
    json.get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        })
        .and_then(|b| b.get("text"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            OracleClientError::LlmBackend("Anthropic response missing a text block".to_owned())
        })
}

/// Create an LLM backend from configuration.
pub fn create_backend(config: &LlmBackendConfig) -> LlmBackend {
    match config.backend_type {
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
        BackendType::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(config)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(backend_type: BackendType) -> LlmBackendConfig {
        LlmBackendConfig {
            backend_type,
            api_url: "https://api.example.com/v1/".to_owned(),
            api_key: "test".to_owned(),
            model: "test-model".to_owned(),
        }
    }

    fn prompt() -> RenderedPrompt {
        RenderedPrompt {
            system: "你是联邦主脑。".to_owned(),
            user: "Generate the next state.".to_owned(),
        }
    }

    const SAMPLING: Sampling = Sampling {
        temperature: 0.5,
        max_tokens: 1024,
    };

    #[test]
    fn extract_openai_content_valid() {
        let json = serde_json::json!({
            "choices": [{ "message": { "content": "{\"deltaFog\": 1}" } }]
        });
        assert!(extract_openai_content(&json).unwrap().contains("deltaFog"));
    }

    #[test]
    fn extract_openai_content_missing_or_empty() {
        assert!(extract_openai_content(&serde_json::json!({"error": "rate_limit"})).is_err());
        let empty = serde_json::json!({ "choices": [{ "message": { "content": "  " } }] });
        assert!(extract_openai_content(&empty).is_err());
    }

    #[test]
    fn extract_anthropic_skips_non_text_blocks() {
        let json = serde_json::json!({
            "content": [
                { "type": "thinking", "thinking": "..." },
                { "type": "text", "text": "{\"deltaClarity\": -2}" }
            ]
        });
        assert!(extract_anthropic_content(&json).unwrap().contains("deltaClarity"));
    }

    #[test]
    fn extract_anthropic_content_missing() {
        assert!(extract_anthropic_content(&serde_json::json!({"content": []})).is_err());
    }

    #[test]
    fn openai_body_carries_strict_schema() {
        let backend = OpenAiBackend::new(&config(BackendType::OpenAi));
        assert_eq!(backend.api_url, "https://api.example.com/v1");
        let schema = serde_json::json!({"type": "object"});
        let body = backend.request_body(&prompt(), &schema, SAMPLING);
        assert_eq!(
            body.pointer("/response_format/type").and_then(Value::as_str),
            Some("json_schema")
        );
        assert_eq!(body.pointer("/response_format/json_schema/schema"), Some(&schema));
        assert_eq!(body.pointer("/max_tokens"), Some(&serde_json::json!(1024)));
        assert_eq!(
            body.pointer("/messages/0/role").and_then(Value::as_str),
            Some("system")
        );
    }

    #[test]
    fn anthropic_body_embeds_schema_in_system() {
        let backend = AnthropicBackend::new(&config(BackendType::Anthropic));
        let schema = serde_json::json!({"required": ["narrativeOutcome"]});
        let body = backend.request_body(&prompt(), &schema, SAMPLING);
        let system = body.get("system").and_then(Value::as_str).unwrap();
        assert!(system.starts_with("你是联邦主脑。"));
        assert!(system.contains("narrativeOutcome"));
        assert_eq!(body.pointer("/messages/0/content").and_then(Value::as_str), Some("Generate the next state."));
    }

    #[test]
    fn create_backend_dispatches_correctly() {
        let backend = create_backend(&config(BackendType::OpenAi));
        assert_eq!(backend.name(), "openai-compatible");
        assert_eq!(backend.model(), "test-model");
        let backend = create_backend(&config(BackendType::Anthropic));
        assert_eq!(backend.name(), "anthropic");
    }
}
