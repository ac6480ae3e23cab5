//! Prompt template loading and rendering via `minijinja`.
//!
//! The three templates (`system.j2`, `turn.j2`, `street_view.j2`) are
//! compiled into the binary. A templates directory can override any of
//! them by file name so operators can tune the narrator without
//! recompiling; files that are absent fall back to the built-in text.

use std::path::Path;

use minijinja::Environment;
use prosperity_types::{GameState, SceneType, StreetView, TurnInput};
use serde::Serialize;

use crate::error::OracleClientError;

const BUILTIN_TEMPLATES: [(&str, &str, &str); 3] = [
    ("system", "system.j2", include_str!("../templates/system.j2")),
    ("turn", "turn.j2", include_str!("../templates/turn.j2")),
    (
        "street_view",
        "street_view.j2",
        include_str!("../templates/street_view.j2"),
    ),
];

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing the narrator's role.
    pub system: String,
    /// User message describing the state and the player's action.
    pub user: String,
}

/// The slice of state the model is shown for one turn.
///
/// The model sees where and when the player is and what they did, never
/// the full snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TurnPromptContext<'a> {
    /// In-world year.
    pub year: i32,
    /// Title of the current era.
    pub era_title: &'static str,
    /// Title of the current scene.
    pub scene_title: &'static str,
    /// Current social fog.
    pub social_fog: u8,
    /// Current social clarity.
    pub social_clarity: u8,
    /// Action identifier, e.g. `CLAUSE_ASSEMBLY`.
    pub action_type: &'static str,
    /// The player's content.
    pub content: &'a str,
    /// Title of the scene the turn moves into.
    pub next_scene_title: &'static str,
}

impl<'a> TurnPromptContext<'a> {
    /// Build the context for `input` applied to `state`.
    pub fn new(state: &GameState, input: &'a TurnInput, next_scene: SceneType) -> Self {
        Self {
            year: state.year,
            era_title: state.era.title(),
            scene_title: state.current_scene.title(),
            social_fog: state.social_fog,
            social_clarity: state.social_clarity,
            action_type: input.action_type.id(),
            content: &input.content,
            next_scene_title: next_scene.title(),
        }
    }
}

/// Manages prompt template loading and rendering.
#[derive(Debug)]
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// An engine using only the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if a built-in template fails
    /// to compile.
    pub fn builtin() -> Result<Self, OracleClientError> {
        Self::new(None)
    }

    /// An engine whose templates may be overridden from `templates_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if an override file exists
    /// but cannot be read, or any template fails to compile.
    pub fn new(templates_dir: Option<&Path>) -> Result<Self, OracleClientError> {
        let mut env = Environment::new();
        for (name, filename, builtin) in BUILTIN_TEMPLATES {
            let source = match templates_dir.map(|dir| dir.join(filename)) {
                Some(path) if path.is_file() => std::fs::read_to_string(&path).map_err(|e| {
                    OracleClientError::Template(format!("failed to read {}: {e}", path.display()))
                })?,
                _ => builtin.to_owned(),
            };
            env.add_template_owned(name, source).map_err(|e| {
                OracleClientError::Template(format!("failed to add {name} template: {e}"))
            })?;
        }
        Ok(Self { env })
    }

    fn render_named<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, OracleClientError> {
        self.env
            .get_template(name)
            .map_err(|e| OracleClientError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| OracleClientError::Template(format!("{name} render failed: {e}")))
    }

    /// Render the system and user messages for one turn.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if rendering fails.
    pub fn render_turn(
        &self,
        ctx: &TurnPromptContext<'_>,
    ) -> Result<RenderedPrompt, OracleClientError> {
        Ok(RenderedPrompt {
            system: self.render_named("system", ctx)?,
            user: self.render_named("turn", ctx)?,
        })
    }

    /// Render the image prompt for a street view.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Template`] if rendering fails.
    pub fn render_street_view(&self, view: &StreetView) -> Result<String, OracleClientError> {
        self.render_named(
            "street_view",
            minijinja::context! {
                description => &view.description,
                weather => &view.weather,
                crowd_mood => &view.crowd_mood,
                visual_details => &view.visual_details,
            },
        )
    }
}
