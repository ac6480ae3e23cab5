//! Terminal front end for The Last Prosperity.
//!
//! Wires the LLM oracle, the file save slot, and the session controller
//! together, then runs the start screen, intro, and turn loop over stdin.
//! The game screen goes to stdout; logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `prosperity-config.yaml`
//! 2. Initialize structured logging (tracing) at the configured level
//! 3. Configure the oracle backends from the environment
//! 4. Open the save slot
//! 5. Run the read loop until the player quits or stdin closes

mod app;
mod command;
mod error;
mod render;

use std::path::Path;

use prosperity_core::config::{CONFIG_FILE_NAME, GameConfig};
use prosperity_core::persistence::FileSaveSlot;
use prosperity_core::session::SessionController;
use prosperity_oracle::{LlmOracle, OracleConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Outcome};
use crate::command::Command;
use crate::error::CliError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration fails or the terminal cannot be read.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = GameConfig::load_or_default(Path::new(CONFIG_FILE_NAME)).map_err(CliError::from)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        save_dir = %config.save.dir.display(),
        slot = config.save.slot,
        "prosperity-cli starting"
    );

    // 3. Configure the oracle.
    let oracle_config = OracleConfig::from_env().map_err(CliError::from)?;
    let oracle = LlmOracle::new(&oracle_config).map_err(CliError::from)?;
    info!(
        backend = oracle.backend().name(),
        model = oracle.backend().model(),
        images = oracle.has_image_backend(),
        timeout_ms = oracle_config.timeout.as_millis(),
        "oracle configured"
    );

    // 4. Open the save slot.
    let slot = FileSaveSlot::new(&config.save.dir, &config.save.slot);
    let session = SessionController::new(oracle, slot);

    // 5. Run the read loop.
    let mut app = App::new(session, config.display);
    run(&mut app).await?;

    info!(
        turn = app.session().state().turn,
        "prosperity-cli shutdown complete"
    );
    Ok(())
}

/// Print the current screen, then handle stdin one line at a time.
async fn run(app: &mut App<LlmOracle, FileSaveSlot>) -> Result<(), CliError> {
    println!("{}", app.screen());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match app.handle(Command::parse(&line)).await? {
            Outcome::Show(text) if text.is_empty() => {}
            Outcome::Show(text) => println!("{text}"),
            Outcome::Quit => break,
        }
    }
    Ok(())
}
