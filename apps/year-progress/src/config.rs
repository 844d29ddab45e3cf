//! Configuration for year progress.

use progress_core::{Cadence, Granularity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_NAME: &str = "year-progress";

/// Largest accepted block bar length.
pub const MAX_BLOCKS: usize = 1000;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default path.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path().filter(|p| p.exists()) else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    /// Parse TOML and bring out-of-range values back into range.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.display.blocks = config.display.blocks.clamp(1, MAX_BLOCKS);
        Ok(config)
    }

    /// Save configuration to default path.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    /// Get configuration file path.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Settings database path, honoring the configured override.
    pub fn settings_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("", "", APP_NAME)
                    .map(|d| d.data_dir().join("settings.db"))
            })
            .unwrap_or_else(|| "year-progress.db".into())
    }

    /// Log file path.
    pub fn log_path() -> PathBuf {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|d| d.data_dir().join("year-progress.log"))
            .unwrap_or_else(|| "year-progress.log".into())
    }
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Refresh cadence.
    #[serde(default)]
    pub cadence: Cadence,
    /// Grid cell unit.
    #[serde(default)]
    pub grid: Granularity,
    /// Number of glyphs in the block bar.
    #[serde(default = "default_blocks")]
    pub blocks: usize,
    /// Text shown left of the percentage.
    #[serde(default = "default_label")]
    pub label: String,
    /// Show the block bar.
    #[serde(default = "default_true")]
    pub show_blocks: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cadence: Cadence::Second,
            grid: Granularity::Days,
            blocks: default_blocks(),
            label: default_label(),
            show_blocks: true,
        }
    }
}

fn default_blocks() -> usize {
    100
}

fn default_label() -> String {
    "LOADING".to_string()
}

fn default_true() -> bool {
    true
}

/// Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Settings database location.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    /// Parsed level, `INFO` when unrecognized.
    pub fn level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.cadence, Cadence::Second);
        assert_eq!(config.display.grid, Granularity::Days);
        assert_eq!(config.display.blocks, 100);
        assert_eq!(config.display.label, "LOADING");
        assert_eq!(config.logging.level(), tracing::Level::INFO);
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(
            r#"
            [display]
            cadence = "minute"
            grid = "weeks"

            [storage]
            path = "/tmp/yp.db"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.display.cadence, Cadence::Minute);
        assert_eq!(config.display.grid, Granularity::Weeks);
        assert_eq!(config.display.blocks, 100);
        assert!(config.display.show_blocks);
        assert_eq!(config.settings_path(), PathBuf::from("/tmp/yp.db"));
        assert_eq!(config.logging.level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(Config::parse("display = 42").is_err());
        assert!(Config::parse("[display]\nblocks = -1").is_err());

        let config = Config::parse("[logging]\nlevel = \"loud\"").unwrap();
        assert_eq!(config.logging.level(), tracing::Level::INFO);
    }

    #[test]
    fn test_blocks_clamped() {
        let config = Config::parse("[display]\nblocks = 10000000").unwrap();
        assert_eq!(config.display.blocks, MAX_BLOCKS);

        let config = Config::parse("[display]\nblocks = 0").unwrap();
        assert_eq!(config.display.blocks, 1);

        let config = Config::parse("[display]\nblocks = 20").unwrap();
        assert_eq!(config.display.blocks, 20);
    }

    #[test]
    fn test_round_trip_toml() {
        let mut config = Config::default();
        config.display.grid = Granularity::None;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
