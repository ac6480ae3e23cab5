//! LLM-backed simulation oracle for The Last Prosperity.
//!
//! Implements [`SimulationOracle`](prosperity_core::oracle::SimulationOracle)
//! on top of an HTTP text backend and an optional image backend.
//!
//! # Architecture
//!
//! ```text
//! GameState + TurnInput --> Prompt Engine --> LLM Backend --> Parser --> SimulationResponse
//!                                                                  \--> Image Backend (best effort)
//! ```
//!
//! # Modules
//!
//! - [`config`] -- Environment configuration for both backends.
//! - [`error`] -- [`OracleClientError`](error::OracleClientError).
//! - [`image`] -- Street view image generation.
//! - [`llm`] -- OpenAI-compatible and Anthropic text backends.
//! - [`oracle`] -- [`LlmOracle`], the capability implementation.
//! - [`parse`] -- Recovery and strict validation of model output.
//! - [`prompt`] -- `minijinja` templates, built in and overridable.
//! - [`schema`] -- JSON Schema of the response.

pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod oracle;
pub mod parse;
pub mod prompt;
pub mod schema;

pub use config::OracleConfig;
pub use error::OracleClientError;
pub use oracle::LlmOracle;
