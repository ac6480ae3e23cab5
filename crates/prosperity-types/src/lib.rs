//! Shared type definitions for The Last Prosperity.
//!
//! This crate is the single source of truth for the game's data model.
//! Types flow downstream to `TypeScript` via `ts-rs` for the browser
//! dashboard, and their JSON shape is the save-slot format.
//!
//! # Modules
//!
//! - [`enums`] -- Scenes, eras, action kinds, and window classifications
//! - [`state`] -- [`GameState`] and the four dashboard windows
//! - [`turn`] -- Player input and oracle output for a single turn
//! - [`initial`] -- The opening snapshot and intro lore

pub mod enums;
pub mod initial;
pub mod state;
pub mod turn;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionType, Era, IntelligenceLevel, SceneType, Sentiment};
pub use initial::{LORE_INTRO_TEXT, PLACEHOLDER_STREET_IMAGE, initial_game_state};
pub use state::{
    GAUGE_MAX, GameState, InternalReport, Media, StateError, StreetView, WarRoom, WindowState,
};
pub use turn::{
    CLAUSE_SEPARATOR, ClauseSelection, InputError, MAX_ASSEMBLED_CLAUSES, OBSERVE_CONTENT,
    SimulationResponse, TurnInput,
};
