//! The authoritative game snapshot and its dashboard windows.
//!
//! [`GameState`] is what the session controller owns, what the resolver
//! folds oracle output into, and what the save slot stores as JSON.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Era, IntelligenceLevel, SceneType, Sentiment};

/// Upper bound shared by every percentage-style gauge.
pub const GAUGE_MAX: u8 = 100;

/// Reasons a [`GameState`] fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Turn counter is zero; turns start at 1.
    #[error("turn must start at 1, found 0")]
    ZeroTurn,

    /// A gauge is above [`GAUGE_MAX`].
    #[error("{field} out of range: {value} > 100")]
    GaugeOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The value found.
        value: u8,
    },
}

/// Complete snapshot of a running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Turn counter, starts at 1 and grows by one per resolved turn.
    pub turn: u32,
    /// In-world calendar year.
    pub year: i32,
    /// Civilizational era.
    pub era: Era,
    /// Informational obscurity, 0 (clear) to 100 (opaque).
    pub social_fog: u8,
    /// Regime stability, 0 (collapse) to 100 (secure).
    pub social_clarity: u8,
    /// Time slot of the current scene.
    pub current_scene: SceneType,
    /// Narrative framing for the current scene.
    pub scene_context: String,
    /// The four dashboard panels.
    pub windows: WindowState,
    /// Append-only log of action and outcome lines.
    pub history: Vec<String>,
    /// Policy clauses offered for assembly.
    pub available_clauses: Vec<String>,
    /// Short replies offered this turn.
    pub available_quick_replies: Vec<String>,
}

impl GameState {
    /// Check the range invariants of a snapshot.
    ///
    /// Applied to every state read back from storage, since the save slot
    /// is outside the process's control.
    ///
    /// # Errors
    ///
    /// Returns the first [`StateError`] found.
    pub const fn validate(&self) -> Result<(), StateError> {
        if self.turn == 0 {
            return Err(StateError::ZeroTurn);
        }
        if self.social_fog > GAUGE_MAX {
            return Err(StateError::GaugeOutOfRange {
                field: "socialFog",
                value: self.social_fog,
            });
        }
        if self.social_clarity > GAUGE_MAX {
            return Err(StateError::GaugeOutOfRange {
                field: "socialClarity",
                value: self.social_clarity,
            });
        }
        if self.windows.war_room.resource_allocation > GAUGE_MAX {
            return Err(StateError::GaugeOutOfRange {
                field: "resourceAllocation",
                value: self.windows.war_room.resource_allocation,
            });
        }
        if self.windows.internal_report.veracity_score > GAUGE_MAX {
            return Err(StateError::GaugeOutOfRange {
                field: "veracityScore",
                value: self.windows.internal_report.veracity_score,
            });
        }
        Ok(())
    }

    /// The street view image currently on display, if any.
    pub fn street_view_image(&self) -> Option<&str> {
        self.windows.street_view.image.as_deref()
    }
}

/// The four dashboard panels, replaced as a unit each turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WindowState {
    /// Military and threat overview.
    pub war_room: WarRoom,
    /// Headlines and public sentiment.
    pub media: Media,
    /// A sampled location somewhere in the federation.
    pub street_view: StreetView,
    /// Intelligence digest of uncertain reliability.
    pub internal_report: InternalReport,
}

/// Threat board and budget split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WarRoom {
    /// Alert label (e.g. "橙色警戒").
    pub status: String,
    /// Currently active threats; empty means all clear.
    pub active_threats: Vec<String>,
    /// Civilian welfare versus fusion R&D split, 0..=100.
    pub resource_allocation: u8,
}

impl WarRoom {
    /// True when no threat is active.
    pub const fn is_all_clear(&self) -> bool {
        self.active_threats.is_empty()
    }
}

/// Media window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Media {
    /// Headlines, lead story first.
    pub headlines: Vec<String>,
    /// Dominant public mood.
    pub sentiment: Sentiment,
    /// The topic everyone is talking about.
    pub trending_topic: String,
}

impl Media {
    /// The lead story, if there is one.
    pub fn lead_headline(&self) -> Option<&str> {
        self.headlines.first().map(String::as_str)
    }
}

/// Street-level view of a federal location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct StreetView {
    /// What the camera sees.
    pub description: String,
    /// Current weather.
    pub weather: String,
    /// Mood of the crowd.
    pub crowd_mood: String,
    /// Ordered visual tags.
    pub visual_details: Vec<String>,
    /// Rendered image as a data URL. Retained across turns when the oracle
    /// does not supply a fresh one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image: Option<String>,
}

/// Intelligence report; the content may be biased or false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct InternalReport {
    /// Report title.
    pub title: String,
    /// Full text.
    pub content: String,
    /// Classification.
    pub intelligence_level: IntelligenceLevel,
    /// Estimated truthfulness, 0..=100.
    pub veracity_score: u8,
}
