//! Enumeration types for The Last Prosperity.
//!
//! Wire values match the JSON the browser client persists and the oracle
//! returns, so every variant carries an explicit `serde` name.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// One of the four daily time slots the game cycles through.
///
/// The cycle order lives in `prosperity-core::scene`; this type only names
/// the slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SceneType {
    /// 08:00 federal security briefing.
    #[serde(rename = "MORNING_BRIEF")]
    MorningBrief,
    /// 14:00 macroeconomic steering session.
    #[serde(rename = "CABINET_STANDUP")]
    CabinetStandup,
    /// 19:00 nationwide broadcast address.
    #[serde(rename = "PUBLIC_COMMUNICATION")]
    PublicCommunication,
    /// 23:00 strategic review.
    #[serde(rename = "WINDOW_READING")]
    WindowReading,
}

impl SceneType {
    /// All scenes in declaration order.
    pub const ALL: [Self; 4] = [
        Self::MorningBrief,
        Self::CabinetStandup,
        Self::PublicCommunication,
        Self::WindowReading,
    ];

    /// The wire identifier of this scene (e.g. `MORNING_BRIEF`).
    pub const fn id(self) -> &'static str {
        match self {
            Self::MorningBrief => "MORNING_BRIEF",
            Self::CabinetStandup => "CABINET_STANDUP",
            Self::PublicCommunication => "PUBLIC_COMMUNICATION",
            Self::WindowReading => "WINDOW_READING",
        }
    }

    /// Resolve a wire identifier back into a scene.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scene| scene.id() == id)
    }

    /// Display title shown in the header and sent to the oracle.
    pub const fn title(self) -> &'static str {
        match self {
            Self::MorningBrief => "08:00 联邦安全简报",
            Self::CabinetStandup => "14:00 宏观经济调控",
            Self::PublicCommunication => "19:00 全境广播讲话",
            Self::WindowReading => "23:00 战略复盘",
        }
    }

    /// The `HH:MM` part of the title.
    pub fn clock_label(self) -> &'static str {
        self.title().split(' ').next().unwrap_or("00:00")
    }
}

// ---------------------------------------------------------------------------
// Eras
// ---------------------------------------------------------------------------

/// Civilizational phase of the federation.
///
/// Only the oracle's narrative moves the era; no mechanical rule does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Era {
    /// The opening era: fusion not yet online, labor in upheaval.
    #[serde(rename = "Centennial Transition")]
    CentennialTransition,
    /// The fusion grid has been connected.
    #[serde(rename = "Fusion Ignition")]
    FusionIgnition,
    /// Mass replacement of human labor by robots.
    #[serde(rename = "Great Displacement")]
    GreatDisplacement,
    /// Borders sealed, the federation turned inward.
    #[serde(rename = "Fortress Era")]
    FortressEra,
}

impl Era {
    /// Display title of the era.
    pub const fn title(self) -> &'static str {
        match self {
            Self::CentennialTransition => "百年转型阵痛期",
            Self::FusionIgnition => "无限能源纪元",
            Self::GreatDisplacement => "大替代危机",
            Self::FortressEra => "孤岛堡垒",
        }
    }
}

// ---------------------------------------------------------------------------
// Player actions
// ---------------------------------------------------------------------------

/// The kind of input the player submitted for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionType {
    /// One to three policy clauses assembled into a decree.
    #[serde(rename = "CLAUSE_ASSEMBLY")]
    ClauseAssembly,
    /// One of the offered short replies.
    #[serde(rename = "QUICK_REPLY")]
    QuickReply,
    /// A free-form written directive.
    #[serde(rename = "FREE_TEXT")]
    FreeText,
    /// Let the day pass without acting.
    #[serde(rename = "OBSERVE")]
    Observe,
}

impl ActionType {
    /// The wire identifier (e.g. `CLAUSE_ASSEMBLY`), also used in history lines.
    pub const fn id(self) -> &'static str {
        match self {
            Self::ClauseAssembly => "CLAUSE_ASSEMBLY",
            Self::QuickReply => "QUICK_REPLY",
            Self::FreeText => "FREE_TEXT",
            Self::Observe => "OBSERVE",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Window enumerations
// ---------------------------------------------------------------------------

/// Dominant public mood reported by the media window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Sentiment {
    /// Fervent, feverish enthusiasm.
    #[serde(rename = "狂热")]
    Fervent,
    /// Numb indifference.
    #[serde(rename = "麻木")]
    Numb,
    /// Open anger.
    #[serde(rename = "愤怒")]
    Angry,
    /// Unrest and turbulence.
    #[serde(rename = "动荡")]
    Turbulent,
}

impl Sentiment {
    /// Wire values accepted from the oracle.
    pub const WIRE_VALUES: [&'static str; 4] = ["狂热", "麻木", "愤怒", "动荡"];

    /// The wire value, also used as the display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fervent => "狂热",
            Self::Numb => "麻木",
            Self::Angry => "愤怒",
            Self::Turbulent => "动荡",
        }
    }
}

/// Classification level of an internal report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum IntelligenceLevel {
    /// Federal top secret.
    #[serde(rename = "联邦绝密")]
    FederalTopSecret,
    /// Restricted internal circulation.
    #[serde(rename = "内部限阅")]
    InternalRestricted,
    /// Open-source intelligence.
    #[serde(rename = "公开情报")]
    OpenSource,
}

impl IntelligenceLevel {
    /// Wire values accepted from the oracle.
    pub const WIRE_VALUES: [&'static str; 3] = ["联邦绝密", "内部限阅", "公开情报"];

    /// The wire value, also used as the display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FederalTopSecret => "联邦绝密",
            Self::InternalRestricted => "内部限阅",
            Self::OpenSource => "公开情报",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn scene_ids_round_trip_through_serde() {
        for scene in SceneType::ALL {
            let json = serde_json::to_string(&scene).unwrap();
            assert_eq!(json, format!("\"{}\"", scene.id()));
            assert_eq!(SceneType::from_id(scene.id()), Some(scene));
        }
    }

    #[test]
    fn unknown_scene_id_is_none() {
        assert_eq!(SceneType::from_id("LUNCH_BREAK"), None);
    }

    #[test]
    fn clock_label_is_title_prefix() {
        assert_eq!(SceneType::MorningBrief.clock_label(), "08:00");
        assert_eq!(SceneType::WindowReading.clock_label(), "23:00");
    }

    #[test]
    fn era_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&Era::CentennialTransition).unwrap();
        assert_eq!(json, "\"Centennial Transition\"");
        let era: Era = serde_json::from_str("\"Fortress Era\"").unwrap();
        assert_eq!(era, Era::FortressEra);
    }

    #[test]
    fn sentiment_wire_values_deserialize() {
        for value in Sentiment::WIRE_VALUES {
            let parsed: Result<Sentiment, _> = serde_json::from_str(&format!("\"{value}\""));
            assert!(parsed.is_ok(), "{value} should parse");
        }
        let bad: Result<Sentiment, _> = serde_json::from_str("\"cheerful\"");
        assert!(bad.is_err());
    }

    #[test]
    fn intelligence_level_wire_values_deserialize() {
        for value in IntelligenceLevel::WIRE_VALUES {
            let parsed: Result<IntelligenceLevel, _> =
                serde_json::from_str(&format!("\"{value}\""));
            assert!(parsed.is_ok(), "{value} should parse");
        }
    }

    #[test]
    fn action_type_ids_match_serde() {
        let json = serde_json::to_string(&ActionType::ClauseAssembly).unwrap();
        assert_eq!(json, format!("\"{}\"", ActionType::ClauseAssembly.id()));
    }

    #[test]
    fn labels_match_wire_values() {
        let json = serde_json::to_string(&Sentiment::Turbulent).unwrap();
        assert_eq!(json, format!("\"{}\"", Sentiment::Turbulent.label()));
        let json = serde_json::to_string(&IntelligenceLevel::OpenSource).unwrap();
        assert_eq!(json, format!("\"{}\"", IntelligenceLevel::OpenSource.label()));
    }
}
