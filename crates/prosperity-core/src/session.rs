//! The game session controller.
//!
//! [`SessionController`] is the only owner of the authoritative
//! [`GameState`]. It runs the small application state machine
//! (`Start -> Intro -> Playing`, or `Start -> Playing` through a load),
//! enforces one turn in flight at a time, and publishes a
//! [`SessionSnapshot`] on a `tokio::sync::watch` channel after every
//! change so front ends can render without borrowing the controller.
//!
//! A turn only replaces the state once the oracle has answered and the
//! resolver has accepted the answer. Any failure before that point leaves
//! the previous snapshot in place.

use std::sync::Arc;

use prosperity_types::{
    GameState, InputError, LORE_INTRO_TEXT, SceneType, TurnInput, initial_game_state,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::oracle::{OracleError, SimulationOracle};
use crate::persistence::{PersistenceError, SaveSlot, load_state, save_state};
use crate::resolver::{ResolveError, resolve_turn};
use crate::scene::next_scene;

/// Top-level application phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppPhase {
    /// Title screen: new game or load.
    Start,
    /// Boot-sequence lore before the first turn.
    Intro,
    /// The turn loop.
    Playing,
}

/// A transient in-world message for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// The oracle failed; the turn was not applied.
    OracleFailure,
    /// The game was saved.
    Saved,
    /// Saving failed.
    SaveFailed,
    /// Loading failed.
    LoadFailed,
}

impl Notice {
    /// Text shown to the player.
    pub const fn text(self) -> &'static str {
        match self {
            Self::OracleFailure => "联邦主脑连接超时。正在尝试重新握手...",
            Self::Saved => ">> 系统快照已归档至本地存储核心\n>> SNAPSHOT_SAVED",
            Self::SaveFailed => ">> 归档失败：存储扇区错误\n>> SAVE_ERROR",
            Self::LoadFailed => ">> 读取失败：存档文件损坏\n>> CORRUPTED_DATA",
        }
    }
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current phase.
    pub phase: AppPhase,
    /// Current game state.
    pub state: Arc<GameState>,
    /// Whether a turn is being resolved.
    pub busy: bool,
    /// Pending notice, if any.
    pub notice: Option<Notice>,
    /// Whether the save slot holds a game.
    pub has_save: bool,
}

/// Errors from phase transitions, saving, and loading.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation is not allowed in the current phase.
    #[error("operation requires phase {expected:?}, current phase is {actual:?}")]
    WrongPhase {
        /// Phase the operation needs.
        expected: AppPhase,
        /// Phase the session is in.
        actual: AppPhase,
    },

    /// A turn is in flight.
    #[error("a turn is being resolved")]
    Busy,

    /// Reading or writing the save slot failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors from submitting a turn.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Turns are only accepted while playing.
    #[error("turns can only be submitted while playing, current phase is {phase:?}")]
    WrongPhase {
        /// Phase the session is in.
        phase: AppPhase,
    },

    /// Another turn is in flight.
    #[error("a turn is already being resolved")]
    Busy,

    /// The input was rejected before reaching the oracle.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// The oracle failed; the state is unchanged.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The oracle's answer could not be applied; the state is unchanged.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Clears the busy flag when a turn ends, however it ends.
struct InFlight<'a> {
    busy: &'a mut bool,
    tx: &'a watch::Sender<SessionSnapshot>,
}

impl<'a> InFlight<'a> {
    fn begin(busy: &'a mut bool, tx: &'a watch::Sender<SessionSnapshot>) -> Self {
        *busy = true;
        tx.send_modify(|s| s.busy = true);
        Self { busy, tx }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.busy = false;
        self.tx.send_modify(|s| s.busy = false);
    }
}

/// Owner of one game session.
#[derive(Debug)]
pub struct SessionController<O, S> {
    oracle: O,
    slot: S,
    phase: AppPhase,
    state: Arc<GameState>,
    busy: bool,
    notice: Option<Notice>,
    has_save: bool,
    tx: watch::Sender<SessionSnapshot>,
}

impl<O: SimulationOracle, S: SaveSlot> SessionController<O, S> {
    /// A session on the start screen holding the opening snapshot.
    pub fn new(oracle: O, slot: S) -> Self {
        let state = Arc::new(initial_game_state());
        let has_save = slot.exists();
        let (tx, _rx) = watch::channel(SessionSnapshot {
            phase: AppPhase::Start,
            state: Arc::clone(&state),
            busy: false,
            notice: None,
            has_save,
        });
        Self {
            oracle,
            slot,
            phase: AppPhase::Start,
            state,
            busy: false,
            notice: None,
            has_save,
            tx,
        }
    }

    /// Begin a fresh campaign: reset the state and play the intro.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] outside the start screen.
    pub fn start_new_game(&mut self) -> Result<(), SessionError> {
        self.require_phase(AppPhase::Start)?;
        self.state = Arc::new(initial_game_state());
        self.phase = AppPhase::Intro;
        self.notice = None;
        info!("new game started");
        self.publish();
        Ok(())
    }

    /// Leave the intro, whether it finished or was skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] outside the intro.
    pub fn finish_intro(&mut self) -> Result<(), SessionError> {
        self.require_phase(AppPhase::Intro)?;
        self.phase = AppPhase::Playing;
        self.publish();
        Ok(())
    }

    /// Resume the saved game and go straight to the turn loop.
    ///
    /// On failure the phase and state are untouched and
    /// [`Notice::LoadFailed`] is raised.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] outside the start screen and
    /// [`SessionError::Persistence`] when the slot is empty, unreadable,
    /// or corrupted.
    pub fn load_game(&mut self) -> Result<(), SessionError> {
        self.require_phase(AppPhase::Start)?;
        match load_state(&self.slot) {
            Ok(state) => {
                info!(turn = state.turn, scene = state.current_scene.id(), "game loaded");
                self.state = Arc::new(state);
                self.phase = AppPhase::Playing;
                self.notice = None;
                self.publish();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load saved game");
                self.notice = Some(Notice::LoadFailed);
                self.publish();
                Err(e.into())
            }
        }
    }

    /// Write the current state to the save slot.
    ///
    /// Raises [`Notice::Saved`] or [`Notice::SaveFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] outside the turn loop,
    /// [`SessionError::Busy`] while a turn is in flight, and
    /// [`SessionError::Persistence`] when the write fails.
    pub fn save_game(&mut self) -> Result<(), SessionError> {
        self.require_phase(AppPhase::Playing)?;
        if self.busy {
            return Err(SessionError::Busy);
        }
        let result = save_state(&self.slot, &self.state);
        match &result {
            Ok(()) => {
                info!(turn = self.state.turn, "game saved");
                self.has_save = true;
                self.notice = Some(Notice::Saved);
            }
            Err(e) => {
                warn!(error = %e, "failed to save game");
                self.notice = Some(Notice::SaveFailed);
            }
        }
        self.publish();
        result.map_err(SessionError::from)
    }

    /// Play one turn.
    ///
    /// The input is validated before the oracle is consulted. The oracle is
    /// asked about the scene the state will move into, then its answer is
    /// folded in by the resolver. On any failure the state is unchanged;
    /// an oracle failure also raises [`Notice::OracleFailure`].
    ///
    /// # Errors
    ///
    /// See [`SubmitError`].
    pub async fn submit_action(&mut self, input: TurnInput) -> Result<Arc<GameState>, SubmitError> {
        if self.phase != AppPhase::Playing {
            return Err(SubmitError::WrongPhase { phase: self.phase });
        }
        if self.busy {
            return Err(SubmitError::Busy);
        }
        input.validate()?;

        let intended = next_scene(self.state.current_scene);
        let outcome = {
            let _in_flight = InFlight::begin(&mut self.busy, &self.tx);
            info!(
                turn = self.state.turn,
                action_type = input.action_type.id(),
                scene = self.state.current_scene.id(),
                next_scene = intended.id(),
                "resolving turn"
            );
            self.oracle
                .resolve_turn(&self.state, &input, intended)
                .await
        };

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!(turn = self.state.turn, error = %e, "oracle failed, turn not applied");
                self.notice = Some(Notice::OracleFailure);
                self.publish();
                return Err(e.into());
            }
        };

        let next = match resolve_turn(&self.state, &input, response) {
            Ok(next) => next,
            Err(e) => {
                warn!(turn = self.state.turn, error = %e, "oracle response rejected");
                self.notice = Some(Notice::OracleFailure);
                self.publish();
                return Err(e.into());
            }
        };

        info!(
            turn = next.turn,
            scene = next.current_scene.id(),
            social_fog = next.social_fog,
            social_clarity = next.social_clarity,
            "turn resolved"
        );
        self.state = Arc::new(next);
        self.publish();
        Ok(Arc::clone(&self.state))
    }

    /// Clear the pending notice.
    pub fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.publish();
        }
    }

    /// The current game state.
    pub fn state(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    /// The current phase.
    pub const fn phase(&self) -> AppPhase {
        self.phase
    }

    /// Whether a turn is in flight.
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the save slot holds a game.
    pub const fn has_save(&self) -> bool {
        self.has_save
    }

    /// The pending notice, if any.
    pub const fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// The scene the next turn will move into.
    pub fn upcoming_scene(&self) -> SceneType {
        next_scene(self.state.current_scene)
    }

    /// Receive a snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// The boot-sequence lines for the intro phase.
    pub const fn intro_lines(&self) -> &'static [&'static str] {
        &LORE_INTRO_TEXT
    }

    /// The oracle this session consults.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The save slot this session writes to.
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    fn require_phase(&self, expected: AppPhase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            state: Arc::clone(&self.state),
            busy: self.busy,
            notice: self.notice,
            has_save: self.has_save,
        }
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}
