//! Game configuration loaded from `prosperity-config.yaml`.
//!
//! Every section and field has a default, so a missing file, an empty file,
//! or a file with only some keys all produce a usable [`GameConfig`].
//! Oracle credentials are not part of this file; they come from the
//! environment (see the `prosperity-oracle` crate).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::persistence::DEFAULT_SLOT;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "prosperity-config.yaml";

/// Environment variable overriding `save.dir`.
pub const SAVE_DIR_ENV: &str = "PROSPERITY_SAVE_DIR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Where the save slot lives.
    #[serde(default)]
    pub save: SaveConfig,

    /// How much of the state the front end shows.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `PROSPERITY_SAVE_DIR` overrides `save.dir` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.save.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only when the file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.save.apply_env_overrides();
            Ok(config)
        }
    }
}

/// Save slot location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveConfig {
    /// Directory holding the slot file.
    #[serde(default = "default_save_dir")]
    pub dir: PathBuf,

    /// Slot name; the file is `<dir>/<slot>.json`.
    #[serde(default = "default_slot")]
    pub slot: String,
}

impl SaveConfig {
    /// Override `dir` from `PROSPERITY_SAVE_DIR` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override `dir` using an arbitrary variable lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(SAVE_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.dir = PathBuf::from(dir);
        }
    }

    /// Full path of the slot file.
    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.slot))
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            dir: default_save_dir(),
            slot: default_slot(),
        }
    }
}

/// Front-end display limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Most clauses shown on the control deck.
    #[serde(default = "default_max_clauses")]
    pub max_clauses: usize,

    /// Most quick replies shown.
    #[serde(default = "default_max_quick_replies")]
    pub max_quick_replies: usize,

    /// History lines shown in the turn summary.
    #[serde(default = "default_history_tail")]
    pub history_tail: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_clauses: default_max_clauses(),
            max_quick_replies: default_max_quick_replies(),
            history_tail: default_history_tail(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("saves")
}

fn default_slot() -> String {
    DEFAULT_SLOT.to_owned()
}

const fn default_max_clauses() -> usize {
    6
}

const fn default_max_quick_replies() -> usize {
    4
}

const fn default_history_tail() -> usize {
    6
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_values() {
        let config = GameConfig::default();
        assert_eq!(config.save.slot, "tlp_save_data");
        assert_eq!(config.display.max_clauses, 6);
        assert_eq!(config.display.max_quick_replies, 4);
        assert_eq!(config.display.history_tail, 6);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
save:
  dir: "/var/lib/prosperity"
  slot: "campaign_two"
display:
  max_clauses: 4
  max_quick_replies: 2
  history_tail: 10
logging:
  level: "debug"
"#;
        let mut config: GameConfig = serde_yml::from_str(yaml).unwrap();
        config.save.apply_overrides_from(|_| None);
        assert_eq!(config.save.dir, PathBuf::from("/var/lib/prosperity"));
        assert_eq!(
            config.save.slot_path(),
            PathBuf::from("/var/lib/prosperity/campaign_two.json")
        );
        assert_eq!(config.display.max_clauses, 4);
        assert_eq!(config.display.history_tail, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let config: GameConfig = serde_yml::from_str("display:\n  history_tail: 2\n").unwrap();
        assert_eq!(config.display.history_tail, 2);
        assert_eq!(config.display.max_clauses, 6);
        assert_eq!(config.save.slot, "tlp_save_data");
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(GameConfig::parse("").is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = GameConfig::parse("display: [unterminated");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn env_lookup_overrides_save_dir() {
        let mut save = SaveConfig::default();
        save.apply_overrides_from(|key| (key == SAVE_DIR_ENV).then(|| "/tmp/tlp".to_owned()));
        assert_eq!(save.dir, PathBuf::from("/tmp/tlp"));

        let mut untouched = SaveConfig::default();
        untouched.apply_overrides_from(|_| Some("   ".to_owned()));
        assert_eq!(untouched.dir, PathBuf::from("saves"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = GameConfig::load_or_default(Path::new("/nonexistent/prosperity.yaml"));
        assert!(config.is_ok());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(CONFIG_FILE_NAME);
        if path.exists() {
            let config = GameConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
