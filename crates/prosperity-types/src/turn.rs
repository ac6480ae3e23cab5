//! Per-turn payloads: what the player submits and what the oracle returns.
//!
//! Neither type is stored. A [`TurnInput`] lives for one submission and a
//! [`SimulationResponse`] is folded into the next `GameState` and dropped.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ActionType;
use crate::state::WindowState;

/// Separator placed between clauses of an assembled decree.
pub const CLAUSE_SEPARATOR: &str = " + ";

/// Most clauses a single decree may combine.
pub const MAX_ASSEMBLED_CLAUSES: usize = 3;

/// Content submitted with an OBSERVE action.
pub const OBSERVE_CONTENT: &str = "静默观察";

/// Reasons a [`TurnInput`] is refused before it reaches the oracle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A clause assembly with nothing selected.
    #[error("clause assembly needs at least one clause")]
    NoClauses,

    /// More clauses than a decree may hold.
    #[error("clause assembly holds {count} clauses, at most 3 allowed")]
    TooManyClauses {
        /// Number of clauses submitted.
        count: usize,
    },

    /// Free text or quick reply with no visible content.
    #[error("{action} content is blank")]
    Blank {
        /// The action that carried blank content.
        action: ActionType,
    },
}

/// A single player submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TurnInput {
    /// What kind of input this is.
    pub action_type: ActionType,
    /// The decree, reply, or directive text.
    pub content: String,
}

impl TurnInput {
    /// Let the day pass without acting.
    pub fn observe() -> Self {
        Self {
            action_type: ActionType::Observe,
            content: OBSERVE_CONTENT.to_owned(),
        }
    }

    /// Pick one of the offered quick replies.
    pub fn quick_reply(reply: impl Into<String>) -> Self {
        Self {
            action_type: ActionType::QuickReply,
            content: reply.into(),
        }
    }

    /// Issue a free-form directive.
    pub fn free_text(text: impl Into<String>) -> Self {
        Self {
            action_type: ActionType::FreeText,
            content: text.into(),
        }
    }

    /// Assemble a decree from selected clauses.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NoClauses`] for an empty selection and
    /// [`InputError::TooManyClauses`] above [`MAX_ASSEMBLED_CLAUSES`].
    pub fn clause_assembly<S: AsRef<str>>(clauses: &[S]) -> Result<Self, InputError> {
        if clauses.is_empty() {
            return Err(InputError::NoClauses);
        }
        if clauses.len() > MAX_ASSEMBLED_CLAUSES {
            return Err(InputError::TooManyClauses {
                count: clauses.len(),
            });
        }
        let content = clauses
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(CLAUSE_SEPARATOR);
        Ok(Self {
            action_type: ActionType::ClauseAssembly,
            content,
        })
    }

    /// Check that the input is worth sending to the oracle.
    ///
    /// Inputs built through the constructors above can still arrive here
    /// malformed when they come off the wire from a front end. The clause
    /// count is enforced only by [`TurnInput::clause_assembly`]; offered
    /// clauses may themselves contain [`CLAUSE_SEPARATOR`], so the joined
    /// text is never split back apart.
    ///
    /// # Errors
    ///
    /// Returns the matching [`InputError`].
    pub fn validate(&self) -> Result<(), InputError> {
        match self.action_type {
            ActionType::ClauseAssembly => {
                if self.content.trim().is_empty() {
                    Err(InputError::NoClauses)
                } else {
                    Ok(())
                }
            }
            ActionType::QuickReply | ActionType::FreeText => {
                if self.content.trim().is_empty() {
                    Err(InputError::Blank {
                        action: self.action_type,
                    })
                } else {
                    Ok(())
                }
            }
            ActionType::Observe => Ok(()),
        }
    }
}

/// The player's in-progress clause picks on the control deck.
///
/// Picks are keyed by their position in the offered list, so two offered
/// clauses with the same text are still separate picks. Order of selection
/// is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseSelection {
    picked: Vec<(usize, String)>,
}

impl ClauseSelection {
    /// An empty selection.
    pub const fn new() -> Self {
        Self { picked: Vec::new() }
    }

    /// Select or deselect the clause offered at `position`.
    ///
    /// A selected position is removed. An unselected one is appended
    /// unless the selection is already full, in which case nothing changes.
    /// Returns whether the position is selected afterwards.
    pub fn toggle(&mut self, position: usize, clause: &str) -> bool {
        if let Some(pos) = self.picked.iter().position(|(p, _)| *p == position) {
            self.picked.remove(pos);
            return false;
        }
        if self.picked.len() >= MAX_ASSEMBLED_CLAUSES {
            return false;
        }
        self.picked.push((position, clause.to_owned()));
        true
    }

    /// Whether the clause offered at `position` is currently selected.
    pub fn contains(&self, position: usize) -> bool {
        self.picked.iter().any(|(p, _)| *p == position)
    }

    /// Selected clause texts in pick order.
    pub fn clauses(&self) -> Vec<&str> {
        self.picked.iter().map(|(_, c)| c.as_str()).collect()
    }

    /// Number of selected clauses.
    pub const fn len(&self) -> usize {
        self.picked.len()
    }

    /// True when nothing is selected.
    pub const fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    /// Drop every selection.
    pub fn clear(&mut self) {
        self.picked.clear();
    }

    /// Build the decree, or `None` when nothing is selected.
    pub fn to_input(&self) -> Option<TurnInput> {
        TurnInput::clause_assembly(&self.clauses()).ok()
    }
}

/// Structured outcome of one turn as computed by the oracle.
///
/// Every field is required on the wire; a response missing any of them is
/// a contract violation. Deltas are advisory and re-clamped by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SimulationResponse {
    /// What the decree did, in prose.
    pub narrative_outcome: String,
    /// Atmosphere in the capital office. Descriptive only.
    pub visual_changes: String,
    /// Change to social fog, nominally -5..=5.
    pub delta_fog: i32,
    /// Change to social clarity, nominally -5..=5.
    pub delta_clarity: i32,
    /// Full replacement of all four windows.
    pub windows: WindowState,
    /// Framing for the scene about to begin.
    pub next_scene_context: String,
    /// Replacement clause list.
    pub new_clauses: Vec<String>,
    /// Replacement quick-reply list.
    pub new_quick_replies: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clause_assembly_joins_with_separator() {
        let input = TurnInput::clause_assembly(&["封锁边境", "投放粮食储备"]).unwrap();
        assert_eq!(input.action_type, ActionType::ClauseAssembly);
        assert_eq!(input.content, "封锁边境 + 投放粮食储备");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn clause_assembly_rejects_empty_and_oversized() {
        let none: [&str; 0] = [];
        assert_eq!(TurnInput::clause_assembly(&none), Err(InputError::NoClauses));
        assert_eq!(
            TurnInput::clause_assembly(&["a", "b", "c", "d"]),
            Err(InputError::TooManyClauses { count: 4 })
        );
    }

    #[test]
    fn validate_catches_wire_inputs() {
        let empty = TurnInput {
            action_type: ActionType::ClauseAssembly,
            content: "  ".to_owned(),
        };
        assert_eq!(empty.validate(), Err(InputError::NoClauses));

        let separator_inside_clause =
            TurnInput::clause_assembly(&["加税 + 减支", "b", "c"]).unwrap();
        assert_eq!(separator_inside_clause.content, "加税 + 减支 + b + c");
        assert!(separator_inside_clause.validate().is_ok());

        assert!(TurnInput::free_text("\n ").validate().is_err());
        assert!(TurnInput::quick_reply("").validate().is_err());
        assert!(TurnInput::observe().validate().is_ok());
    }

    #[test]
    fn selection_toggles_and_caps_at_three() {
        let mut selection = ClauseSelection::new();
        assert!(selection.to_input().is_none());

        assert!(selection.toggle(0, "a"));
        assert!(selection.toggle(1, "b"));
        assert!(selection.toggle(2, "c"));
        assert!(!selection.toggle(3, "d"), "fourth clause is ignored");
        assert_eq!(selection.len(), 3);
        assert!(!selection.contains(3));

        assert!(!selection.toggle(1, "b"), "toggling a picked clause removes it");
        assert_eq!(selection.clauses(), ["a", "c"]);

        let input = selection.to_input().unwrap();
        assert_eq!(input.content, "a + c");

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn identical_offered_clauses_are_separate_picks() {
        let mut selection = ClauseSelection::new();
        assert!(selection.toggle(0, "延长宵禁"));
        assert!(selection.toggle(2, "延长宵禁"));
        assert!(selection.contains(0));
        assert!(selection.contains(2));
        assert_eq!(selection.to_input().unwrap().content, "延长宵禁 + 延长宵禁");
    }

    #[test]
    fn response_requires_every_field() {
        let json = serde_json::json!({
            "narrativeOutcome": "x",
            "visualChanges": "y",
            "deltaFog": 1,
            "deltaClarity": -1,
            "nextSceneContext": "z",
            "newClauses": [],
            "newQuickReplies": []
        });
        let parsed: Result<SimulationResponse, _> = serde_json::from_value(json);
        assert!(parsed.is_err(), "missing windows must not parse");
    }
}
