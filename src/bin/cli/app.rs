use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use vocab_srs::srs::{CardStateStore, StudyMode, VocabList};
use vocab_srs::storage::FileStorage;
use vocab_srs::SrsConfig;

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    pub config: SrsConfig,
}

impl App {
    /// Initialize from the given or default data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FileStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let config = SrsConfig::load(&data_dir)
            .with_context(|| format!("Failed to read config in {}", data_dir.display()))?;

        Ok(Self { data_dir, config })
    }

    /// Mode from the command line, else the configured default
    pub fn resolve_mode(&self, mode: Option<StudyMode>) -> StudyMode {
        mode.unwrap_or(self.config.default_mode)
    }

    /// Read a vocabulary list file
    pub fn load_list(&self, path: &Path) -> Result<VocabList> {
        let list = FileStorage::read_list(path)
            .with_context(|| format!("Failed to read vocabulary list {}", path.display()))?;

        if list.id.is_empty() {
            bail!("Vocabulary list {} has no id", path.display());
        }

        Ok(list)
    }

    /// Card state store backed by the data directory
    pub fn state_store(&self) -> CardStateStore<FileStorage> {
        CardStateStore::new(FileStorage::new(self.data_dir.clone()))
    }
}
