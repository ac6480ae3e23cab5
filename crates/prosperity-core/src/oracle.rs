//! The simulation oracle capability and a scripted implementation.
//!
//! The oracle is whatever computes the consequences of a turn: in
//! production an LLM behind HTTP (`prosperity-oracle`), in tests a
//! [`ScriptedOracle`]. The controller only ever sees this trait and a
//! single opaque [`OracleError`]; network failures, timeouts, and malformed
//! output are indistinguishable past this boundary.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use prosperity_types::{GameState, SceneType, SimulationResponse, TurnInput};

/// Any failure to obtain a valid [`SimulationResponse`].
///
/// The message is for logs only; players see a fixed in-world notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("oracle failure: {message}")]
pub struct OracleError {
    message: String,
}

impl OracleError {
    /// Create an oracle error with a diagnostic message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A source of turn outcomes.
///
/// Implementations must not mutate `state`. `intended_next_scene` is the
/// scene the resolver will move into, so the oracle can write the next
/// scene context and windows for the upcoming time slot rather than the
/// current one.
pub trait SimulationOracle {
    /// Compute the outcome of `input` applied to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] for any failure to produce a complete,
    /// well-formed response.
    fn resolve_turn(
        &self,
        state: &GameState,
        input: &TurnInput,
        intended_next_scene: SceneType,
    ) -> impl Future<Output = Result<SimulationResponse, OracleError>> + Send;
}

/// A request received by a [`ScriptedOracle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    /// Turn number of the state the oracle was shown.
    pub turn: u32,
    /// The player's input.
    pub input: TurnInput,
    /// Scene the caller intends to move into.
    pub intended_next_scene: SceneType,
}

/// An oracle that replays queued outcomes in order.
///
/// Once the script runs out every call fails. Every request is recorded,
/// including the failing ones.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    script: Mutex<VecDeque<Result<SimulationResponse, OracleError>>>,
    calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedOracle {
    /// Create an oracle with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an oracle that replays `outcomes` in order.
    pub fn with_script(
        outcomes: impl IntoIterator<Item = Result<SimulationResponse, OracleError>>,
    ) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful outcome.
    pub fn push_response(&self, response: SimulationResponse) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Ok(response));
        }
    }

    /// Queue a failure.
    pub fn push_failure(&self, message: &str) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(OracleError::new(message)));
        }
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn next_outcome(
        &self,
        state: &GameState,
        input: &TurnInput,
        intended_next_scene: SceneType,
    ) -> Result<SimulationResponse, OracleError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(OracleCall {
                turn: state.turn,
                input: input.clone(),
                intended_next_scene,
            });
        }
        let mut script = self
            .script
            .lock()
            .map_err(|_err| OracleError::new("scripted oracle lock poisoned"))?;
        script
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::new("scripted oracle has no outcomes left")))
    }
}

impl SimulationOracle for ScriptedOracle {
    async fn resolve_turn(
        &self,
        state: &GameState,
        input: &TurnInput,
        intended_next_scene: SceneType,
    ) -> Result<SimulationResponse, OracleError> {
        self.next_outcome(state, input, intended_next_scene)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prosperity_types::initial_game_state;

    use super::*;
    use crate::testing::sample_response;

    #[tokio::test]
    async fn replays_script_in_order_then_fails() {
        let oracle = ScriptedOracle::with_script([
            Ok(sample_response(-1, 1)),
            Err(OracleError::new("boom")),
        ]);
        let state = initial_game_state();
        let input = TurnInput::observe();

        let first = oracle
            .resolve_turn(&state, &input, SceneType::CabinetStandup)
            .await;
        assert_eq!(first.unwrap().delta_fog, -1);

        let second = oracle
            .resolve_turn(&state, &input, SceneType::CabinetStandup)
            .await;
        assert_eq!(second.unwrap_err().message(), "boom");

        let third = oracle
            .resolve_turn(&state, &input, SceneType::CabinetStandup)
            .await;
        assert!(third.is_err());
        assert_eq!(oracle.call_count(), 3);
    }

    #[tokio::test]
    async fn records_requested_scene() {
        let oracle = ScriptedOracle::new();
        oracle.push_response(sample_response(0, 0));
        let state = initial_game_state();
        let _ = oracle
            .resolve_turn(&state, &TurnInput::free_text("x"), SceneType::WindowReading)
            .await;
        let calls = oracle.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls.first().map(|c| c.intended_next_scene), Some(SceneType::WindowReading));
        assert_eq!(calls.first().map(|c| c.turn), Some(1));
    }
}
