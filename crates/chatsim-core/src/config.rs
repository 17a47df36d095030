//! Configuration loading and typed config structures for the chat simulation.
//!
//! The canonical configuration lives in `chatsim-config.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure, and
//! provides a loader that reads and validates the file. Every field has a
//! default, so an empty or missing file yields a working configuration.

use std::path::Path;

use serde::Deserialize;

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

    /// A value is outside its permitted range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `chatsim-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatsimConfig {
    /// Engine seeding and pagination.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Tick interval and activity cadence.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Randomized branching thresholds.
    #[serde(default)]
    pub probabilities: ProbabilityConfig,

    /// HTTP bind address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChatsimConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the bind address:
    /// - `PORT` overrides `server.port`
    /// - `HOST` overrides `server.host`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if the file exists, otherwise start from defaults.
    ///
    /// Environment overrides and validation apply in both cases.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.server.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is within its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.tick_interval_ms == 0 {
            return Err(invalid("schedule.tick_interval_ms must be at least 1"));
        }
        if self.engine.latest_page_size == 0 {
            return Err(invalid("engine.latest_page_size must be at least 1"));
        }
        if self.engine.older_page_size == 0 {
            return Err(invalid("engine.older_page_size must be at least 1"));
        }
        self.probabilities.validate()
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Engine seeding and pagination configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Random seed for reproducible runs. Absent means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Generated participants created during setup.
    #[serde(default = "default_seed_participants")]
    pub seed_participants: u32,

    /// Generated messages created during setup.
    #[serde(default = "default_seed_messages")]
    pub seed_messages: u32,

    /// Size of the latest-messages window.
    #[serde(default = "default_page_size")]
    pub latest_page_size: usize,

    /// Maximum size of an older-messages page.
    #[serde(default = "default_page_size")]
    pub older_page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            seed_participants: default_seed_participants(),
            seed_messages: default_seed_messages(),
            latest_page_size: default_page_size(),
            older_page_size: default_page_size(),
        }
    }
}

/// Tick interval and per-activity cadence, in ticks.
///
/// A cadence of `0` disables the corresponding activity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Create a message every N ticks.
    #[serde(default = "default_create_message_every")]
    pub create_message_every: u64,

    /// Update a random message every N ticks.
    #[serde(default = "default_update_message_every")]
    pub update_message_every: u64,

    /// Create a participant every N ticks.
    #[serde(default = "default_create_participant_every")]
    pub create_participant_every: u64,

    /// Update a random participant every N ticks.
    #[serde(default = "default_update_participant_every")]
    pub update_participant_every: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            create_message_every: default_create_message_every(),
            update_message_every: default_update_message_every(),
            create_participant_every: default_create_participant_every(),
            update_participant_every: default_update_participant_every(),
        }
    }
}

/// Probability thresholds used by the mutation operations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbabilityConfig {
    /// Chance a generated message carries an image attachment.
    #[serde(default = "default_attachment")]
    pub attachment: f64,

    /// Chance a generated message replies to an earlier one.
    #[serde(default = "default_reply")]
    pub reply: f64,

    /// Chance a message posted by the main user carries an image attachment.
    #[serde(default = "default_user_attachment")]
    pub user_attachment: f64,

    /// Chance a message update replaces the text rather than adding a reaction.
    #[serde(default = "default_text_edit")]
    pub text_edit: f64,

    /// Chance a participant update changes the display name rather than the avatar.
    #[serde(default = "default_display_name_change")]
    pub display_name_change: f64,

    /// Reactions per message before updates fall back to text edits.
    #[serde(default = "default_max_reactions")]
    pub max_reactions: usize,
}

impl ProbabilityConfig {
    /// Check that every probability lies within `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("attachment", self.attachment),
            ("reply", self.reply),
            ("user_attachment", self.user_attachment),
            ("text_edit", self.text_edit),
            ("display_name_change", self.display_name_change),
        ];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    reason: format!("probabilities.{name} must be within [0, 1], got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            attachment: default_attachment(),
            reply: default_reply(),
            user_attachment: default_user_attachment(),
            text_edit: default_text_edit(),
            display_name_change: default_display_name_change(),
            max_reactions: default_max_reactions(),
        }
    }
}

/// HTTP bind address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Override the bind address with `HOST` / `PORT` when set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            self.port = val.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("PORT={val} is not a valid port: {e}"),
            })?;
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit newline-delimited JSON instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_seed_participants() -> u32 {
    5
}

const fn default_seed_messages() -> u32 {
    50
}

const fn default_page_size() -> usize {
    25
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_create_message_every() -> u64 {
    600
}

const fn default_update_message_every() -> u64 {
    30
}

const fn default_create_participant_every() -> u64 {
    3600
}

const fn default_update_participant_every() -> u64 {
    600
}

const fn default_attachment() -> f64 {
    0.05
}

const fn default_reply() -> f64 {
    0.05
}

const fn default_user_attachment() -> f64 {
    0.5
}

const fn default_text_edit() -> f64 {
    0.7
}

const fn default_display_name_change() -> f64 {
    0.5
}

const fn default_max_reactions() -> usize {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    14000
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ChatsimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.seed_participants, 5);
        assert_eq!(config.engine.seed_messages, 50);
        assert_eq!(config.engine.latest_page_size, 25);
        assert_eq!(config.schedule.tick_interval_ms, 1000);
        assert_eq!(config.schedule.create_participant_every, 3600);
        assert_eq!(config.probabilities.max_reactions, 10);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
engine:
  seed: 123
  seed_participants: 3
  seed_messages: 10
  latest_page_size: 5
  older_page_size: 7

schedule:
  tick_interval_ms: 250
  create_message_every: 2
  update_message_every: 3
  create_participant_every: 4
  update_participant_every: 0

probabilities:
  attachment: 0.25
  reply: 0.5
  user_attachment: 0.0
  text_edit: 1.0
  display_name_change: 0.1
  max_reactions: 3

logging:
  level: "debug"
  json: true
"#;

        let config = ChatsimConfig::parse(yaml);
        assert!(config.is_ok(), "parse failed: {config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.engine.seed, Some(123));
        assert_eq!(config.engine.seed_messages, 10);
        assert_eq!(config.engine.older_page_size, 7);
        assert_eq!(config.schedule.tick_interval_ms, 250);
        assert_eq!(config.schedule.update_participant_every, 0);
        assert_eq!(config.probabilities.max_reactions, 3);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "engine:\n  seed: 7\n";
        let config = ChatsimConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Seed is overridden
        assert_eq!(config.engine.seed, Some(7));
        // Everything else uses defaults
        assert_eq!(config.schedule.create_message_every, 600);
        assert_eq!(config.engine.seed_participants, 5);
    }

    #[test]
    fn parse_empty_mapping() {
        let config = ChatsimConfig::parse("{}");
        assert!(config.is_ok());
    }

    #[test]
    fn probability_out_of_range_is_rejected() {
        let yaml = "probabilities:\n  reply: 1.5\n";
        let config = ChatsimConfig::parse(yaml);
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let yaml = "schedule:\n  tick_interval_ms: 0\n";
        let config = ChatsimConfig::parse(yaml);
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("does-not-exist.yaml");
        let config = ChatsimConfig::load_or_default(&path);
        assert!(config.is_ok());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("chatsim-config.yaml");
        if path.exists() {
            let config = ChatsimConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
