//! Oracle configuration loaded from the environment.
//!
//! The text backend is required. The image backend is optional; when
//! `IMAGE_API_URL` is unset the street view keeps its previous picture.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::OracleClientError;

/// Default deadline for one text call, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 90_000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Default completion budget. A full response with four windows and two
/// option lists is long.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default image size.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x768";

/// Complete oracle configuration.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Text backend used for turn resolution.
    pub backend: LlmBackendConfig,
    /// Deadline for the text call.
    pub timeout: Duration,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token budget.
    pub max_tokens: u32,
    /// Directory whose `*.j2` files override the built-in templates.
    pub templates_dir: Option<PathBuf>,
    /// Optional street view image backend.
    pub image: Option<ImageBackendConfig>,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible API (works with `OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

impl BackendType {
    /// Parse a backend name as accepted in `ORACLE_BACKEND`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Config`] for an unknown name.
    pub fn parse(name: &str) -> Result<Self, OracleClientError> {
        match name.trim().to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(OracleClientError::Config(format!(
                "unknown backend type: {other}"
            ))),
        }
    }
}

/// Configuration for the image backend (`OpenAI` images API shape).
#[derive(Debug, Clone)]
pub struct ImageBackendConfig {
    /// Base API URL.
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Requested size, e.g. `1024x768`.
    pub size: String,
}

impl OracleConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `ORACLE_BACKEND` -- `openai`, `deepseek`, `ollama`, `anthropic`, or `claude`
    /// - `ORACLE_API_URL` -- API base URL
    /// - `ORACLE_API_KEY` -- API key
    /// - `ORACLE_MODEL` -- model name
    ///
    /// Optional variables:
    /// - `ORACLE_TIMEOUT_MS` -- text call deadline (default 90000)
    /// - `ORACLE_TEMPERATURE` -- sampling temperature (default 0.8)
    /// - `ORACLE_MAX_TOKENS` -- completion budget (default 4096)
    /// - `TEMPLATES_DIR` -- directory of template overrides
    /// - `IMAGE_API_URL`, `IMAGE_API_KEY`, `IMAGE_MODEL`, `IMAGE_SIZE` --
    ///   street view image backend; disabled when `IMAGE_API_URL` is unset
    pub fn from_env() -> Result<Self, OracleClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, OracleClientError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| OracleClientError::Config(format!("missing required env var {name}")))
        };

        let backend = LlmBackendConfig {
            backend_type: BackendType::parse(&required("ORACLE_BACKEND")?)?,
            api_url: required("ORACLE_API_URL")?,
            api_key: required("ORACLE_API_KEY")?,
            model: required("ORACLE_MODEL")?,
        };

        let timeout_ms: u64 = lookup("ORACLE_TIMEOUT_MS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|e| OracleClientError::Config(format!("invalid ORACLE_TIMEOUT_MS: {e}")))?;

        let temperature: f32 = lookup("ORACLE_TEMPERATURE")
            .unwrap_or_else(|| DEFAULT_TEMPERATURE.to_string())
            .parse()
            .map_err(|e| OracleClientError::Config(format!("invalid ORACLE_TEMPERATURE: {e}")))?;

        let max_tokens: u32 = lookup("ORACLE_MAX_TOKENS")
            .unwrap_or_else(|| DEFAULT_MAX_TOKENS.to_string())
            .parse()
            .map_err(|e| OracleClientError::Config(format!("invalid ORACLE_MAX_TOKENS: {e}")))?;

        let templates_dir = lookup("TEMPLATES_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let image = match lookup("IMAGE_API_URL").filter(|v| !v.trim().is_empty()) {
            Some(api_url) => Some(ImageBackendConfig {
                api_url,
                api_key: lookup("IMAGE_API_KEY").unwrap_or_default(),
                model: required("IMAGE_MODEL")?,
                size: lookup("IMAGE_SIZE").unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_owned()),
            }),
            None => None,
        };

        Ok(Self {
            backend,
            timeout: Duration::from_millis(timeout_ms),
            temperature,
            max_tokens,
            templates_dir,
            image,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const MINIMAL: [(&str, &str); 4] = [
        ("ORACLE_BACKEND", "deepseek"),
        ("ORACLE_API_URL", "https://api.deepseek.com/v1"),
        ("ORACLE_API_KEY", "sk-test"),
        ("ORACLE_MODEL", "deepseek-chat"),
    ];

    #[test]
    fn backend_type_parsing() {
        assert_eq!(BackendType::parse("OpenAI").unwrap(), BackendType::OpenAi);
        assert_eq!(BackendType::parse("ollama").unwrap(), BackendType::OpenAi);
        assert_eq!(BackendType::parse("claude").unwrap(), BackendType::Anthropic);
        assert!(BackendType::parse("gemini").is_err());
    }

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = OracleConfig::from_lookup(lookup_from(&MINIMAL)).unwrap();
        assert_eq!(config.backend.backend_type, BackendType::OpenAi);
        assert_eq!(config.backend.model, "deepseek-chat");
        assert_eq!(config.timeout, Duration::from_millis(90_000));
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.temperature.to_string(), "0.8");
        assert!(config.templates_dir.is_none());
        assert!(config.image.is_none());
    }

    #[test]
    fn missing_required_variable_is_a_config_error() {
        let result = OracleConfig::from_lookup(lookup_from(MINIMAL.get(..3).unwrap_or_default()));
        assert!(matches!(result, Err(OracleClientError::Config(msg)) if msg.contains("ORACLE_MODEL")));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("ORACLE_TIMEOUT_MS", "soon"));
        assert!(OracleConfig::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn image_backend_is_enabled_by_url() {
        let mut pairs = MINIMAL.to_vec();
        pairs.extend([
            ("IMAGE_API_URL", "https://api.openai.com/v1"),
            ("IMAGE_API_KEY", "sk-img"),
            ("IMAGE_MODEL", "gpt-image-1"),
            ("ORACLE_TIMEOUT_MS", "5000"),
            ("TEMPLATES_DIR", "/etc/prosperity/templates"),
        ]);
        let config = OracleConfig::from_lookup(lookup_from(&pairs)).unwrap();
        let image = config.image.unwrap();
        assert_eq!(image.model, "gpt-image-1");
        assert_eq!(image.size, DEFAULT_IMAGE_SIZE);
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(
            config.templates_dir,
            Some(PathBuf::from("/etc/prosperity/templates"))
        );
    }
}
