//! Key-value persistence port for scheduling state
//!
//! The scheduling engine never talks to a concrete backend. It reads and
//! writes opaque string values through [`Storage`], which is implemented by:
//! - [`FileStorage`]: one JSON file per key under the data directory
//! - [`MemoryStorage`]: a process-local map, used for headless sessions and tests

mod file_storage;
mod memory;

pub use file_storage::{FileStorage, StorageError};
pub use memory::MemoryStorage;

pub type Result<T> = std::result::Result<T, StorageError>;

/// A string key-value store holding serialized scheduling state
pub trait Storage {
    /// Read the value stored under `key`, or `None` if nothing was written yet
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
