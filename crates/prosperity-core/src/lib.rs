//! Turn engine for The Last Prosperity.
//!
//! This crate owns everything between the player's input and the next
//! snapshot: the daily scene cycle, the pure turn resolver, the oracle
//! capability the resolver is fed from, the save slot, and the session
//! controller that ties them together.
//!
//! # Modules
//!
//! - [`scene`] -- The four-slot daily cycle and scene title lookup.
//! - [`resolver`] -- Folding an oracle response into the next
//!   [`GameState`](prosperity_types::GameState).
//! - [`oracle`] -- [`SimulationOracle`] trait and [`ScriptedOracle`].
//! - [`persistence`] -- [`SaveSlot`] trait, file and memory slots.
//! - [`session`] -- [`SessionController`], the app phase machine.
//! - [`config`] -- Configuration loading from `prosperity-config.yaml`.
//! - [`testing`] -- Canned oracle responses.
//!
//! [`SimulationOracle`]: oracle::SimulationOracle
//! [`ScriptedOracle`]: oracle::ScriptedOracle
//! [`SaveSlot`]: persistence::SaveSlot
//! [`SessionController`]: session::SessionController

pub mod config;
pub mod oracle;
pub mod persistence;
pub mod resolver;
pub mod scene;
pub mod session;
pub mod testing;
