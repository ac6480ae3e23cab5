//! Street view image generation.
//!
//! Talks to an `OpenAI` images API compatible endpoint and turns the
//! base64 payload into a data URL the dashboard can display directly.

use serde_json::Value;

use crate::config::ImageBackendConfig;
use crate::error::OracleClientError;

/// Prefix of every image URL this backend produces.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Backend for `{api_url}/images/generations`.
#[derive(Debug)]
pub struct ImageBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    size: String,
}

impl ImageBackend {
    /// Create a new image backend.
    pub fn new(config: &ImageBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            size: config.size.clone(),
        }
    }

    /// Model identifier for logging.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "size": self.size,
            "n": 1,
            "response_format": "b64_json",
        })
    }

    /// Render `prompt` and return a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Image`] if the call fails or the
    /// response carries no image.
    pub async fn generate(&self, prompt: &str) -> Result<String, OracleClientError> {
        let url = format!("{}/images/generations", self.api_url);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt));
        if !self.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| OracleClientError::Image(format!("image request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(OracleClientError::Image(format!(
                "image backend returned {status}: {error_body}"
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| OracleClientError::Image(format!("image response parse failed: {e}")))?;

        extract_image_data_url(&json)
    }
}

/// Extract `data[0].b64_json` as a PNG data URL.
pub fn extract_image_data_url(json: &Value) -> Result<String, OracleClientError> {
    json.get("data")
        .and_then(|d| d.get(0))
        .and_then(|d| d.get("b64_json"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|b64| format!("{PNG_DATA_URL_PREFIX}{b64}"))
        .ok_or_else(|| OracleClientError::Image("image response missing data[0].b64_json".to_owned()))
}
