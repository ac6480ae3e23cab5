//! Save slot storage for the game snapshot.
//!
//! A game has exactly one named slot holding the JSON form of a
//! [`GameState`]. The slot is only written on an explicit save; nothing in
//! the turn loop touches it.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use prosperity_types::GameState;
use tracing::debug;

/// Slot name used when none is configured.
pub const DEFAULT_SLOT: &str = "tlp_save_data";

/// Errors from reading or writing the save slot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The slot holds no save.
    #[error("no saved game in slot")]
    Missing,

    /// The underlying storage failed.
    #[error("save slot storage error: {source}")]
    Storage {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// The slot holds something that is not a valid game state.
    #[error("saved game is corrupted: {reason}")]
    Corrupted {
        /// What was wrong with the payload.
        reason: String,
    },
}

/// A single named storage slot holding one serialized snapshot.
pub trait SaveSlot {
    /// Whether the slot currently holds a save.
    fn exists(&self) -> bool;

    /// Read the raw payload, `None` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] when the storage fails.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the payload.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] when the storage fails.
    fn write(&self, payload: &str) -> Result<(), PersistenceError>;
}

/// Serialize `state` into `slot`.
///
/// # Errors
///
/// Returns [`PersistenceError::Corrupted`] if the state cannot be
/// serialized, or the slot's storage error.
pub fn save_state<S: SaveSlot + ?Sized>(slot: &S, state: &GameState) -> Result<(), PersistenceError> {
    let payload = serde_json::to_string(state).map_err(|e| PersistenceError::Corrupted {
        reason: format!("serialize: {e}"),
    })?;
    slot.write(&payload)?;
    debug!(turn = state.turn, bytes = payload.len(), "game state saved");
    Ok(())
}

/// Read and validate the snapshot in `slot`.
///
/// # Errors
///
/// Returns [`PersistenceError::Missing`] for an empty slot,
/// [`PersistenceError::Corrupted`] when the payload does not parse or fails
/// [`GameState::validate`], and [`PersistenceError::Storage`] when the
/// storage fails.
pub fn load_state<S: SaveSlot + ?Sized>(slot: &S) -> Result<GameState, PersistenceError> {
    let payload = slot.read()?.ok_or(PersistenceError::Missing)?;
    let state: GameState =
        serde_json::from_str(&payload).map_err(|e| PersistenceError::Corrupted {
            reason: e.to_string(),
        })?;
    state.validate().map_err(|e| PersistenceError::Corrupted {
        reason: e.to_string(),
    })?;
    debug!(turn = state.turn, "game state loaded");
    Ok(state)
}

/// A slot backed by one JSON file, `<dir>/<slot>.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so
/// a crash mid-write never leaves a half-written save.
#[derive(Debug, Clone)]
pub struct FileSaveSlot {
    path: PathBuf,
}

impl FileSaveSlot {
    /// A slot named `slot` inside `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{slot}.json")),
        }
    }

    /// Path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SaveSlot for FileSaveSlot {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, payload: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, payload)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// An in-memory slot.
///
/// Can be armed to fail writes, which exercises the save-failure path
/// without touching a filesystem.
#[derive(Debug, Default)]
pub struct MemorySaveSlot {
    payload: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemorySaveSlot {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with `payload`.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(payload.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current raw payload.
    pub fn payload(&self) -> Option<String> {
        self.payload.lock().ok().and_then(|p| p.clone())
    }
}

fn poisoned() -> PersistenceError {
    PersistenceError::Storage {
        source: io::Error::other("memory slot lock poisoned"),
    }
}

impl SaveSlot for MemorySaveSlot {
    fn exists(&self) -> bool {
        self.payload.lock().is_ok_and(|p| p.is_some())
    }

    fn read(&self) -> Result<Option<String>, PersistenceError> {
        self.payload
            .lock()
            .map(|p| p.clone())
            .map_err(|_err| poisoned())
    }

    fn write(&self, payload: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Storage {
                source: io::Error::other("storage sector error"),
            });
        }
        let mut slot = self.payload.lock().map_err(|_err| poisoned())?;
        *slot = Some(payload.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use prosperity_types::initial_game_state;

    use super::*;

    static NEXT_DIR: AtomicU32 = AtomicU32::new(0);

    fn scratch_dir() -> PathBuf {
        let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("prosperity-save-{}-{n}", std::process::id()))
    }

    #[test]
    fn memory_round_trip_preserves_state() {
        let slot = MemorySaveSlot::new();
        assert!(!slot.exists());
        let mut state = initial_game_state();
        state.turn = 9;
        state.history.push("[2084] FREE_TEXT: x...".to_owned());
        save_state(&slot, &state).unwrap();
        assert!(slot.exists());
        assert_eq!(load_state(&slot).unwrap(), state);
    }

    #[test]
    fn empty_slot_is_missing() {
        let slot = MemorySaveSlot::new();
        assert!(matches!(load_state(&slot), Err(PersistenceError::Missing)));
    }

    #[test]
    fn garbage_is_corrupted() {
        let slot = MemorySaveSlot::with_payload("{not json");
        assert!(matches!(
            load_state(&slot),
            Err(PersistenceError::Corrupted { .. })
        ));
    }

    #[test]
    fn out_of_range_save_is_corrupted() {
        let mut json = serde_json::to_value(initial_game_state()).unwrap();
        json["socialFog"] = serde_json::json!(250);
        let slot = MemorySaveSlot::with_payload(json.to_string());
        assert!(matches!(
            load_state(&slot),
            Err(PersistenceError::Corrupted { .. })
        ));
    }

    #[test]
    fn armed_slot_fails_writes_and_keeps_payload() {
        let slot = MemorySaveSlot::with_payload("old");
        slot.set_fail_writes(true);
        let result = save_state(&slot, &initial_game_state());
        assert!(matches!(result, Err(PersistenceError::Storage { .. })));
        assert_eq!(slot.payload().as_deref(), Some("old"));
    }

    #[test]
    fn file_slot_round_trip() {
        let dir = scratch_dir();
        let slot = FileSaveSlot::new(&dir, DEFAULT_SLOT);
        assert!(!slot.exists());
        assert!(slot.read().unwrap().is_none());

        let state = initial_game_state();
        save_state(&slot, &state).unwrap();
        assert!(slot.exists());
        assert!(slot.path().ends_with("tlp_save_data.json"));
        assert_eq!(load_state(&slot).unwrap(), state);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn file_slot_overwrites_previous_save() {
        let dir = scratch_dir();
        let slot = FileSaveSlot::new(&dir, "overwrite");
        let mut state = initial_game_state();
        save_state(&slot, &state).unwrap();
        state.turn = 3;
        save_state(&slot, &state).unwrap();
        assert_eq!(load_state(&slot).unwrap().turn, 3);
        assert!(!slot.temp_path().exists());

        let _ = std::fs::remove_dir_all(dir);
    }
}
