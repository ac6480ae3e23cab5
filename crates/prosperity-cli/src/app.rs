//! The terminal front end's state machine.
//!
//! [`App`] sits between the read loop and the [`SessionController`]: it
//! maps a [`Command`] onto the session operation valid for the current
//! phase and returns the text to print. The clause selection lives here
//! because it only exists on screen. Session notices are shown once and
//! then dismissed.

use prosperity_core::config::DisplayConfig;
use prosperity_core::oracle::SimulationOracle;
use prosperity_core::persistence::SaveSlot;
use prosperity_core::session::{AppPhase, SessionController, SessionError, SubmitError};
use prosperity_types::{ClauseSelection, MAX_ASSEMBLED_CLAUSES, TurnInput};
use tracing::debug;

use crate::command::{Command, PLAYING_HELP, START_HELP};
use crate::error::CliError;
use crate::render;

/// What the read loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text and read the next line.
    Show(String),
    /// Leave the program.
    Quit,
}

/// Front end state over one session.
#[derive(Debug)]
pub struct App<O, S> {
    session: SessionController<O, S>,
    display: DisplayConfig,
    selection: ClauseSelection,
}

impl<O: SimulationOracle, S: SaveSlot> App<O, S> {
    /// Wrap a session that is still on the start screen.
    pub fn new(session: SessionController<O, S>, display: DisplayConfig) -> Self {
        Self {
            session,
            display,
            selection: ClauseSelection::new(),
        }
    }

    /// The session being driven.
    pub const fn session(&self) -> &SessionController<O, S> {
        &self.session
    }

    /// The screen for the current phase.
    pub fn screen(&self) -> String {
        match self.session.phase() {
            AppPhase::Start => render::start_screen(self.session.has_save()),
            AppPhase::Intro => self.session.intro_lines().join("\n"),
            AppPhase::Playing => self.dashboard(),
        }
    }

    /// Apply one command and report what to print.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Session`] or [`CliError::Turn`] when the session
    /// refuses an operation the front end believed valid. Failures the
    /// player can recover from are reported as text instead.
    pub async fn handle(&mut self, command: Command) -> Result<Outcome, CliError> {
        if command == Command::Quit {
            return Ok(Outcome::Quit);
        }
        debug!(phase = ?self.session.phase(), command = ?command, "handling command");
        let text = match self.session.phase() {
            AppPhase::Start => self.on_start(command)?,
            AppPhase::Intro => self.on_intro(command)?,
            AppPhase::Playing => self.on_playing(command).await?,
        };
        Ok(Outcome::Show(self.with_notice(text)))
    }

    fn on_start(&mut self, command: Command) -> Result<String, CliError> {
        match command {
            Command::NewGame => {
                self.session.start_new_game()?;
                self.selection.clear();
                Ok(format!("{}\n\n（回车继续）", self.screen()))
            }
            Command::LoadGame => match self.session.load_game() {
                Ok(()) => {
                    self.selection.clear();
                    Ok(self.dashboard())
                }
                Err(SessionError::Persistence(_)) => Ok(self.screen()),
                Err(e) => Err(e.into()),
            },
            Command::Unknown(reason) => Ok(format!("{reason}\n{START_HELP}")),
            _ => Ok(START_HELP.to_owned()),
        }
    }

    fn on_intro(&mut self, command: Command) -> Result<String, CliError> {
        match command {
            Command::Help => Ok("（回车继续）".to_owned()),
            _ => {
                self.session.finish_intro()?;
                Ok(self.dashboard())
            }
        }
    }

    async fn on_playing(&mut self, command: Command) -> Result<String, CliError> {
        let state = self.session.state();
        let text = match command {
            Command::ToggleClause(index) => {
                let Some(clause) = state
                    .available_clauses
                    .get(index)
                    .filter(|_| index < self.display.max_clauses)
                else {
                    return Ok("没有这一项条款".to_owned());
                };
                let was_selected = self.selection.contains(index);
                if self.selection.toggle(index, clause) || was_selected {
                    self.dashboard()
                } else {
                    format!("最多选择 {MAX_ASSEMBLED_CLAUSES} 项条款\n{}", self.dashboard())
                }
            }
            Command::Decree => match self.selection.to_input() {
                Some(input) => self.submit(input).await?,
                None => "尚未选择任何条款".to_owned(),
            },
            Command::Reply(index) => {
                let Some(reply) = state
                    .available_quick_replies
                    .get(index)
                    .filter(|_| index < self.display.max_quick_replies)
                else {
                    return Ok("没有这一项回复".to_owned());
                };
                self.submit(TurnInput::quick_reply(reply.clone())).await?
            }
            Command::Say(text) => self.submit(TurnInput::free_text(text)).await?,
            Command::Observe => self.submit(TurnInput::observe()).await?,
            Command::Save => match self.session.save_game() {
                Ok(()) | Err(SessionError::Persistence(_)) => String::new(),
                Err(e) => return Err(e.into()),
            },
            Command::History => render::full_history(&state),
            Command::Help => PLAYING_HELP.to_owned(),
            Command::Unknown(reason) => format!("{reason}\n输入 help 查看指令"),
            Command::Continue | Command::NewGame | Command::LoadGame | Command::Quit => {
                self.dashboard()
            }
        };
        Ok(text)
    }

    /// Run one turn; turn failures become text, session misuse is an error.
    async fn submit(&mut self, input: TurnInput) -> Result<String, CliError> {
        match self.session.submit_action(input).await {
            Ok(_) => {
                self.selection.clear();
                Ok(self.dashboard())
            }
            Err(SubmitError::InvalidInput(e)) => Ok(format!("指令无效: {e}")),
            Err(SubmitError::Oracle(_) | SubmitError::Resolve(_)) => Ok(String::new()),
            Err(e @ (SubmitError::WrongPhase { .. } | SubmitError::Busy)) => Err(e.into()),
        }
    }

    fn dashboard(&self) -> String {
        render::dashboard(
            &self.session.state(),
            self.session.upcoming_scene(),
            &self.display,
            &self.selection,
        )
    }

    fn with_notice(&mut self, text: String) -> String {
        let Some(notice) = self.session.notice() else {
            return text;
        };
        self.session.dismiss_notice();
        if text.is_empty() {
            render::notice(notice)
        } else {
            format!("{}\n{text}", render::notice(notice))
        }
    }
}
