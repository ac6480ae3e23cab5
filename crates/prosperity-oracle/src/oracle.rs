//! The LLM-backed [`SimulationOracle`].
//!
//! One turn is: render the prompt, call the text backend under a deadline,
//! parse and validate the answer, then try to refresh the street view
//! image. Everything up to validation can fail the turn. The image step
//! never does; on any failure it logs and leaves the image empty so the
//! resolver keeps the previous picture.

use std::time::{Duration, Instant};

use prosperity_core::oracle::{OracleError, SimulationOracle};
use prosperity_types::{GameState, SceneType, SimulationResponse, TurnInput};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::OracleConfig;
use crate::error::OracleClientError;
use crate::image::ImageBackend;
use crate::llm::{LlmBackend, Sampling, create_backend};
use crate::parse::parse_simulation_response;
use crate::prompt::{PromptEngine, TurnPromptContext};
use crate::schema::simulation_schema;

/// Simulation oracle talking to a hosted or local model over HTTP.
#[derive(Debug)]
pub struct LlmOracle {
    prompts: PromptEngine,
    backend: LlmBackend,
    image: Option<ImageBackend>,
    schema: Value,
    sampling: Sampling,
    timeout: Duration,
}

impl LlmOracle {
    /// Build an oracle from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if the prompt templates do
    /// not load.
    pub fn new(config: &OracleConfig) -> Result<Self, OracleClientError> {
        let prompts = PromptEngine::new(config.templates_dir.as_deref())?;
        Ok(Self::with_parts(
            prompts,
            create_backend(&config.backend),
            config.image.as_ref().map(ImageBackend::new),
            Sampling {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
            config.timeout,
        ))
    }

    /// Assemble an oracle from already-built parts.
    pub fn with_parts(
        prompts: PromptEngine,
        backend: LlmBackend,
        image: Option<ImageBackend>,
        sampling: Sampling,
        timeout: Duration,
    ) -> Self {
        Self {
            prompts,
            backend,
            image,
            schema: simulation_schema(),
            sampling,
            timeout,
        }
    }

    /// The text backend in use.
    pub const fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    /// Whether street view images are generated.
    pub const fn has_image_backend(&self) -> bool {
        self.image.is_some()
    }

    /// Run one turn through the model and return the validated response.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleClientError`] for template, transport, timeout,
    /// or parse failures.
    pub async fn simulate(
        &self,
        state: &GameState,
        input: &TurnInput,
        intended_next_scene: SceneType,
    ) -> Result<SimulationResponse, OracleClientError> {
        let ctx = TurnPromptContext::new(state, input, intended_next_scene);
        let prompt = self.prompts.render_turn(&ctx)?;

        let started = Instant::now();
        let raw = tokio::time::timeout(
            self.timeout,
            self.backend.complete(&prompt, &self.schema, self.sampling),
        )
        .await
        .map_err(|_elapsed| OracleClientError::Timeout {
            timeout_ms: self.timeout.as_millis(),
        })??;
        info!(
            backend = self.backend.name(),
            model = self.backend.model(),
            latency_ms = started.elapsed().as_millis(),
            response_bytes = raw.len(),
            "model answered"
        );

        let mut response = parse_simulation_response(&raw)?;
        response.windows.street_view.image = self.refresh_image(&response).await;
        Ok(response)
    }

    /// Best-effort street view image for the new view.
    async fn refresh_image(&self, response: &SimulationResponse) -> Option<String> {
        let backend = self.image.as_ref()?;
        let result = match self.prompts.render_street_view(&response.windows.street_view) {
            Ok(prompt) => tokio::time::timeout(self.timeout, backend.generate(&prompt))
                .await
                .unwrap_or_else(|_elapsed| {
                    Err(OracleClientError::Timeout {
                        timeout_ms: self.timeout.as_millis(),
                    })
                }),
            Err(e) => Err(e),
        };
        match result {
            Ok(url) => {
                debug!(model = backend.model(), bytes = url.len(), "street view image refreshed");
                Some(url)
            }
            Err(e) => {
                warn!(error = %e, "street view image refresh failed, keeping previous image");
                None
            }
        }
    }
}

impl SimulationOracle for LlmOracle {
    async fn resolve_turn(
        &self,
        state: &GameState,
        input: &TurnInput,
        intended_next_scene: SceneType,
    ) -> Result<SimulationResponse, OracleError> {
        self.simulate(state, input, intended_next_scene)
            .await
            .map_err(|e| {
                warn!(turn = state.turn, error = %e, "oracle call failed");
                OracleError::from(e)
            })
    }
}
