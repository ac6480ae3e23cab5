//! Error types for the terminal front end.
//!
//! [`CliError`] is the top-level error type that wraps every failure mode
//! during startup and the read loop. Oracle, save, and load failures are
//! not fatal: the session reports those as notices and the loop carries on.

/// Top-level error for the `prosperity-cli` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Game configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: prosperity_core::config::ConfigError,
    },

    /// The oracle could not be configured or its templates did not load.
    #[error("oracle setup error: {source}")]
    Oracle {
        /// The underlying oracle client error.
        #[from]
        source: prosperity_oracle::OracleClientError,
    },

    /// A phase transition was refused by the session.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: prosperity_core::session::SessionError,
    },

    /// A turn was submitted while the session could not take one.
    #[error("turn error: {source}")]
    Turn {
        /// The underlying submit error.
        #[from]
        source: prosperity_core::session::SubmitError,
    },

    /// Reading the terminal failed.
    #[error("terminal I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
