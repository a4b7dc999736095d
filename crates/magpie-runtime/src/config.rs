//! Configuration loading using figment.
//!
//! Three layers, later ones override earlier ones:
//!
//! 1. Built-in defaults
//! 2. `magpie.toml` in the working directory
//! 3. Environment variables (`MAGPIE_*`)
//!
//! Environment variables use the `MAGPIE_` prefix with `__` as the nesting
//! separator:
//!
//! - `MAGPIE_SLACK__API_TOKEN=xoxb-...` → `slack.api_token`
//! - `MAGPIE_SLACK__SIGNING_SECRET=...` → `slack.signing_secret`
//! - `MAGPIE_LOGGING__LEVEL=debug` → `logging.level`

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use magpie_slack::SlackConfig;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "magpie.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Figment could not assemble or deserialize the configuration.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A named configuration file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The Slack credentials are missing or blank.
    #[error("slack api_token and signing_secret must be configured")]
    MissingCredentials,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagpieConfig {
    /// Bot-level settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Slack transport settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bot-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name, used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
        }
    }
}

fn default_bot_name() -> String {
    "magpie".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error). `RUST_LOG`
    /// overrides this when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line, abbreviated output.
    #[default]
    Compact,
    /// The tracing-subscriber default format.
    Full,
    /// Multi-line human-friendly output.
    Pretty,
}

impl MagpieConfig {
    /// Loads configuration from the default layers.
    pub fn load() -> ConfigResult<Self> {
        Self::extract(Self::base_figment().merge(Toml::file(DEFAULT_CONFIG_FILE)))
    }

    /// Loads configuration from a specific file plus the environment layer.
    pub fn load_from<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Self::extract(Self::base_figment().merge(Toml::file(path)))
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(MagpieConfig::default()))
    }

    fn extract(figment: Figment) -> ConfigResult<Self> {
        let figment = figment.merge(Env::prefixed("MAGPIE_").split("__"));
        let config: MagpieConfig = figment.extract().map_err(Box::new)?;
        debug!(
            bot = %config.bot.name,
            level = %config.logging.level,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Verifies that the Slack credentials are present.
    ///
    /// Called before serving so a misconfigured bot fails at startup instead
    /// of rejecting every webhook request.
    pub fn ensure_credentials(&self) -> ConfigResult<()> {
        if self.slack.has_credentials() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> MagpieConfig {
        let figment = Figment::from(Serialized::defaults(MagpieConfig::default()))
            .merge(Toml::string(toml));
        figment.extract().unwrap()
    }

    #[test]
    fn defaults() {
        let config = from_toml("");
        assert_eq!(config.bot.name, "magpie");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.slack.port, 3000);
        assert!(!config.slack.has_credentials());
    }

    #[test]
    fn toml_layer_overrides_defaults() {
        let config = from_toml(
            r#"
            [bot]
            name = "pica"

            [slack]
            api_token = "xoxb-token"
            signing_secret = "sekrit"
            port = 8080

            [logging]
            level = "debug"
            format = "pretty"
            "#,
        );
        assert_eq!(config.bot.name, "pica");
        assert_eq!(config.slack.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.slack.has_credentials());
    }

    #[test]
    fn missing_credentials_fail_validation() {
        let config = from_toml("");
        assert!(matches!(
            config.ensure_credentials(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            MagpieConfig::load_from("/nonexistent/magpie.toml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
