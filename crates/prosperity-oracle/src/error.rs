//! Error types for the LLM oracle client.
//!
//! Every variant collapses into a single opaque
//! [`OracleError`](prosperity_core::oracle::OracleError) at the capability
//! boundary; the distinctions here only serve the logs.

use prosperity_core::oracle::OracleError;

/// Errors that can occur while consulting the model.
#[derive(Debug, thiserror::Error)]
pub enum OracleClientError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// The text backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// The image backend returned an error or was unreachable.
    #[error("image backend error: {0}")]
    Image(String),

    /// The model's text could not be turned into a valid response.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The call did not finish in time.
    #[error("timeout: no answer within {timeout_ms} ms")]
    Timeout {
        /// The deadline that was exceeded.
        timeout_ms: u128,
    },

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<OracleClientError> for OracleError {
    fn from(err: OracleClientError) -> Self {
        Self::new(err.to_string())
    }
}
