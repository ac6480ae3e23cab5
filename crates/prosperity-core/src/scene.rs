//! The daily scene cycle.
//!
//! Four time slots repeat in a fixed order. The cycle is the only source of
//! truth for which scene follows which; the turn resolver and the session
//! controller both derive the upcoming scene from here so the scene the
//! oracle was asked about is always the scene the state moves into.

use prosperity_types::SceneType;

/// The daily loop, in order.
pub const SCENE_CYCLE: [SceneType; 4] = [
    SceneType::MorningBrief,
    SceneType::CabinetStandup,
    SceneType::PublicCommunication,
    SceneType::WindowReading,
];

/// Title shown for a scene identifier that is not part of the cycle.
pub const UNKNOWN_SCENE_TITLE: &str = "00:00 待定时段";

/// Clock label shown for a scene identifier that is not part of the cycle.
pub const UNKNOWN_CLOCK_LABEL: &str = "00:00";

/// Position of a scene within [`SCENE_CYCLE`].
pub const fn cycle_index(scene: SceneType) -> usize {
    match scene {
        SceneType::MorningBrief => 0,
        SceneType::CabinetStandup => 1,
        SceneType::PublicCommunication => 2,
        SceneType::WindowReading => 3,
    }
}

/// The scene that follows `current` in the daily loop.
pub fn next_scene(current: SceneType) -> SceneType {
    nth_scene_after(current, 1)
}

/// The scene `steps` slots after `current`, wrapping around the day.
pub fn nth_scene_after(current: SceneType, steps: usize) -> SceneType {
    // Cycle length is a non-zero constant; the remainders cannot fail.
    let len = SCENE_CYCLE.len();
    let offset = steps.checked_rem(len).unwrap_or(0);
    let idx = cycle_index(current)
        .checked_add(offset)
        .and_then(|i| i.checked_rem(len))
        .unwrap_or(0);
    SCENE_CYCLE.get(idx).copied().unwrap_or(SceneType::MorningBrief)
}

/// Display title for a scene identifier string.
///
/// Unrecognized identifiers render as [`UNKNOWN_SCENE_TITLE`] instead of
/// failing, so a stale or hand-edited value never breaks the header.
pub fn scene_title_for_id(id: &str) -> &'static str {
    SceneType::from_id(id).map_or(UNKNOWN_SCENE_TITLE, SceneType::title)
}

/// Clock label (`HH:MM`) for a scene identifier string.
pub fn clock_label_for_id(id: &str) -> &'static str {
    SceneType::from_id(id).map_or(UNKNOWN_CLOCK_LABEL, SceneType::clock_label)
}
