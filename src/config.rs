//! Engine configuration, read from `config.toml` in the data directory

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::srs::{QueueBuilder, StudyMode, MAX_NEW_CARDS};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Engine settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrsConfig {
    /// Never-seen cards admitted into one session
    pub max_new_cards: usize,
    /// Study direction used when none is given
    pub default_mode: StudyMode,
    /// Shuffle the queue when a session starts
    pub shuffle_on_start: bool,
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            max_new_cards: MAX_NEW_CARDS,
            default_mode: StudyMode::Forward,
            shuffle_on_start: false,
        }
    }
}

impl SrsConfig {
    /// Load `config.toml` from a data directory; a missing file gives the defaults
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        fs::write(data_dir.join(CONFIG_FILE_NAME), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn queue_builder(&self) -> QueueBuilder {
        QueueBuilder::new(self.max_new_cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = SrsConfig::load(temp.path()).unwrap();
        assert_eq!(config, SrsConfig::default());
        assert_eq!(config.queue_builder().max_new_cards(), 20);
    }

    #[test]
    fn test_partial_file() {
        let config = SrsConfig::from_toml("default_mode = \"reverse\"\n").unwrap();
        assert_eq!(config.default_mode, StudyMode::Reverse);
        assert_eq!(config.max_new_cards, MAX_NEW_CARDS);
        assert!(!config.shuffle_on_start);
    }

    #[test]
    fn test_invalid_file() {
        assert!(matches!(
            SrsConfig::from_toml("max_new_cards = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let config = SrsConfig {
            max_new_cards: 5,
            default_mode: StudyMode::Reverse,
            shuffle_on_start: true,
        };

        config.save(temp.path()).unwrap();
        assert_eq!(SrsConfig::load(temp.path()).unwrap(), config);
    }
}
