//! Turn resolution: folding an oracle outcome into the next snapshot.
//!
//! [`resolve`] is a pure function of the previous state, the oracle's
//! response, and the two history lines for the turn. It never mutates its
//! input; the session controller swaps the new snapshot in only after
//! resolution succeeds, so a failed turn leaves the old state untouched.
//!
//! # Rules
//!
//! - `turn` grows by exactly one, for every action type.
//! - Fog and clarity are clamped into `0..=100` whatever the deltas are.
//! - The scene advances one step along the cycle, independent of the oracle.
//! - Windows, scene context, clauses, and quick replies are replaced.
//! - The street view image is carried forward when the oracle sent none.
//! - History grows by the action line then the outcome line.
//! - `year` and `era` are carried forward unchanged.

use prosperity_types::{
    ActionType, GAUGE_MAX, GameState, OBSERVE_CONTENT, SimulationResponse, StateError, TurnInput,
};

use crate::scene::next_scene;

/// Prefix used in place of `[year] ACTION` for silent observation turns.
pub const OBSERVE_MARKER: &str = "[静默观察]";

/// Number of characters of the submitted content echoed into history.
pub const HISTORY_PREVIEW_CHARS: usize = 20;

/// Prefix of the outcome line.
pub const OUTCOME_PREFIX: &str = ">> 结果: ";

/// Errors that prevent a response from being folded into the state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The turn counter cannot advance any further.
    #[error("turn counter overflow at turn {turn}")]
    TurnOverflow {
        /// The turn that could not be advanced.
        turn: u32,
    },

    /// The folded state breaks a range invariant (e.g. a window
    /// percentage above 100 supplied by the oracle).
    #[error("resolved state is invalid: {source}")]
    InvalidState {
        /// The violated invariant.
        #[from]
        source: StateError,
    },
}

/// The two history lines recorded for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntries {
    /// Summary of what the player did.
    pub action: String,
    /// Summary of what happened.
    pub outcome: String,
}

impl HistoryEntries {
    /// Build the history lines for a turn.
    ///
    /// The action line reads `[year] ACTION: <preview>...`, where the
    /// preview is the first [`HISTORY_PREVIEW_CHARS`] characters of the
    /// content. Observation turns use [`OBSERVE_MARKER`] and never echo
    /// player content.
    pub fn for_turn(input: &TurnInput, year: i32, narrative_outcome: &str) -> Self {
        let action = match input.action_type {
            ActionType::Observe => {
                format!("{OBSERVE_MARKER}: {}...", preview(OBSERVE_CONTENT))
            }
            other => format!("[{year}] {}: {}...", other.id(), preview(&input.content)),
        };
        Self {
            action,
            outcome: format!("{OUTCOME_PREFIX}{narrative_outcome}"),
        }
    }
}

/// First [`HISTORY_PREVIEW_CHARS`] characters of `content`, never splitting
/// a multi-byte character.
fn preview(content: &str) -> &str {
    content
        .char_indices()
        .nth(HISTORY_PREVIEW_CHARS)
        .and_then(|(byte_idx, _)| content.get(..byte_idx))
        .unwrap_or(content)
}

/// Apply a signed delta to a gauge and clamp into `0..=GAUGE_MAX`.
///
/// Works for any `i32` delta, far outside the nominal `-5..=5`.
pub fn clamp_gauge(current: u8, delta: i32) -> u8 {
    let raw = i64::from(current).saturating_add(i64::from(delta));
    let clamped = raw.clamp(0, i64::from(GAUGE_MAX));
    u8::try_from(clamped).unwrap_or(GAUGE_MAX)
}

/// Fold a successful oracle response into a new snapshot.
///
/// # Errors
///
/// Returns [`ResolveError::TurnOverflow`] if the turn counter is at its
/// maximum and [`ResolveError::InvalidState`] if the response carries
/// out-of-range window values.
pub fn resolve(
    prev: &GameState,
    response: SimulationResponse,
    entries: HistoryEntries,
) -> Result<GameState, ResolveError> {
    let turn = prev
        .turn
        .checked_add(1)
        .ok_or(ResolveError::TurnOverflow { turn: prev.turn })?;

    let mut windows = response.windows;
    if windows.street_view.image.is_none() {
        windows
            .street_view
            .image
            .clone_from(&prev.windows.street_view.image);
    }

    let mut history = Vec::with_capacity(prev.history.len().saturating_add(2));
    history.extend_from_slice(&prev.history);
    history.push(entries.action);
    history.push(entries.outcome);

    let next = GameState {
        turn,
        year: prev.year,
        era: prev.era,
        social_fog: clamp_gauge(prev.social_fog, response.delta_fog),
        social_clarity: clamp_gauge(prev.social_clarity, response.delta_clarity),
        current_scene: next_scene(prev.current_scene),
        scene_context: response.next_scene_context,
        windows,
        history,
        available_clauses: response.new_clauses,
        available_quick_replies: response.new_quick_replies,
    };
    next.validate()?;
    Ok(next)
}

/// Build the history lines from `input` and resolve in one step.
///
/// # Errors
///
/// See [`resolve`].
pub fn resolve_turn(
    prev: &GameState,
    input: &TurnInput,
    response: SimulationResponse,
) -> Result<GameState, ResolveError> {
    let entries = HistoryEntries::for_turn(input, prev.year, &response.narrative_outcome);
    resolve(prev, response, entries)
}
