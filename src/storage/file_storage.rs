//! File-backed storage
//!
//! Directory structure:
//! ```text
//! {data-dir}/
//! ├── config.toml
//! └── state/
//!     └── {percent-encoded key}.json   # e.g. spanish-a1%3Aforward.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Result, Storage};
use crate::srs::VocabList;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("vocab-srs"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.state_dir())?;
        Ok(())
    }

    fn state_dir(&self) -> PathBuf {
        self.base_path.join("state")
    }

    /// Get the file holding the value for a key
    fn state_path(&self, key: &str) -> PathBuf {
        self.state_dir()
            .join(format!("{}.json", urlencoding::encode(key)))
    }

    /// Read a vocabulary list file
    ///
    /// A list without an `id` takes the file stem as its id.
    pub fn read_list(path: &Path) -> Result<VocabList> {
        let content = fs::read_to_string(path)?;
        let mut list: VocabList = serde_json::from_str(&content)?;

        if list.id.trim().is_empty() {
            list.id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        Ok(list)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.state_path(key);
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.init()?;
        fs::write(self.state_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.state_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_missing_key_reads_none() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.get("list:forward").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get() {
        let (mut storage, _temp) = create_test_storage();
        storage.set("list:forward", "{\"a\":1}").unwrap();

        assert_eq!(
            storage.get("list:forward").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(storage.get("list:reverse").unwrap().is_none());
    }

    #[test]
    fn test_keys_map_to_distinct_files() {
        let (mut storage, temp) = create_test_storage();
        storage.set("a:b", "one").unwrap();
        storage.set("a_b", "two").unwrap();
        storage.set("a/b", "three").unwrap();

        assert_eq!(storage.get("a:b").unwrap().as_deref(), Some("one"));
        assert_eq!(storage.get("a_b").unwrap().as_deref(), Some("two"));
        assert_eq!(storage.get("a/b").unwrap().as_deref(), Some("three"));

        let files = fs::read_dir(temp.path().join("state")).unwrap().count();
        assert_eq!(files, 3);
    }

    #[test]
    fn test_remove() {
        let (mut storage, _temp) = create_test_storage();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.get("k").unwrap().is_none());
    }

    #[test]
    fn test_read_list_falls_back_to_file_stem() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("spanish-a1.json");
        fs::write(
            &path,
            r#"{"name":"Spanish A1","cards":[{"id":"w1","primary":"hola","translations":["hello"]}]}"#,
        )
        .unwrap();

        let list = FileStorage::read_list(&path).unwrap();
        assert_eq!(list.id, "spanish-a1");
        assert_eq!(list.cards.len(), 1);
        assert_eq!(list.cards[0].translations, vec!["hello".to_string()]);
    }
}
