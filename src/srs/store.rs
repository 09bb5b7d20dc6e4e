//! Persistence of card states per (list, mode)
//!
//! Each (list, mode) pair is one storage entry under the key `{list}:{mode}`,
//! holding a JSON object of word id to
//! `{interval, repetitions, easeFactor, nextReview, lastQuality}`.

use std::collections::BTreeMap;

use thiserror::Error;

use super::algorithm::MIN_EASE_FACTOR;
use super::models::{CardState, CardStates, StudyMode};
use crate::storage::{Storage, StorageError};

#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("Stored state for {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("Storage unavailable for {key}: {source}")]
    Unavailable { key: String, source: StorageError },
}

pub type Result<T> = std::result::Result<T, StateStoreError>;

/// Storage key for a list under a study mode
pub fn state_key(list_id: &str, mode: StudyMode) -> String {
    format!("{}:{}", list_id, mode)
}

/// Loads and saves card states through a [`Storage`] backend
pub struct CardStateStore<S> {
    storage: S,
}

impl<S: Storage> CardStateStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Load card states, reporting why nothing could be loaded.
    ///
    /// A key that was never written is an empty map, not an error.
    pub fn try_load(&self, list_id: &str, mode: StudyMode) -> Result<CardStates> {
        let key = state_key(list_id, mode);

        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(CardStates::new()),
            Err(source) => return Err(StateStoreError::Unavailable { key, source }),
        };

        let mut states: CardStates = serde_json::from_str(&raw)
            .map_err(|source| StateStoreError::Corrupt { key, source })?;

        for (word_id, state) in states.iter_mut() {
            state.word_id = word_id.clone();
            state.ease_factor = state.ease_factor.max(MIN_EASE_FACTOR);
        }

        Ok(states)
    }

    /// Load card states. Missing, unreadable or corrupt data yields an empty map.
    pub fn load(&self, list_id: &str, mode: StudyMode) -> CardStates {
        self.try_load(list_id, mode).unwrap_or_else(|err| {
            log::warn!("Starting with empty state: {}", err);
            CardStates::new()
        })
    }

    /// Overwrite the stored states for a list and mode
    pub fn save(&mut self, list_id: &str, mode: StudyMode, states: &CardStates) -> Result<()> {
        let key = state_key(list_id, mode);

        // Sorted by word id so the stored document is stable
        let ordered: BTreeMap<&str, &CardState> =
            states.iter().map(|(id, state)| (id.as_str(), state)).collect();
        let raw = serde_json::to_string(&ordered).map_err(|source| StateStoreError::Corrupt {
            key: key.clone(),
            source,
        })?;

        self.storage
            .set(&key, &raw)
            .map_err(|source| StateStoreError::Unavailable { key, source })
    }

    /// Clear stored progress for one list and mode only
    pub fn reset(&mut self, list_id: &str, mode: StudyMode) -> Result<()> {
        let key = state_key(list_id, mode);
        log::info!("Resetting progress for {}", key);

        self.storage
            .remove(&key)
            .map_err(|source| StateStoreError::Unavailable { key, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::models::Quality;
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> crate::storage::Result<Option<String>> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> crate::storage::Result<()> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        fn remove(&mut self, _key: &str) -> crate::storage::Result<()> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
    }

    fn sample_states() -> CardStates {
        let now = Utc.timestamp_millis_opt(1_772_355_600_000).unwrap();
        let mut states = CardStates::new();
        for (id, repetitions) in [("w1", 1), ("w2", 4)] {
            let mut state = CardState::new(id, now);
            state.repetitions = repetitions;
            state.interval = 6;
            state.ease_factor = 2.25;
            state.last_quality = Some(Quality::Good);
            states.insert(id.to_string(), state);
        }
        states
    }

    #[test]
    fn test_state_key() {
        assert_eq!(state_key("spanish", StudyMode::Forward), "spanish:forward");
        assert_eq!(state_key("spanish", StudyMode::Reverse), "spanish:reverse");
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut store = CardStateStore::new(MemoryStorage::new());
        let states = sample_states();

        store.save("list", StudyMode::Forward, &states).unwrap();
        assert_eq!(store.load("list", StudyMode::Forward), states);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let store = CardStateStore::new(MemoryStorage::new());
        assert!(store.try_load("list", StudyMode::Forward).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_data_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.set("list:forward", "{not json").unwrap();
        let store = CardStateStore::new(storage);

        assert!(matches!(
            store.try_load("list", StudyMode::Forward),
            Err(StateStoreError::Corrupt { .. })
        ));
        assert!(store.load("list", StudyMode::Forward).is_empty());
    }

    #[test]
    fn test_unavailable_storage() {
        let mut store = CardStateStore::new(BrokenStorage);

        assert!(store.load("list", StudyMode::Forward).is_empty());
        assert!(matches!(
            store.save("list", StudyMode::Forward, &sample_states()),
            Err(StateStoreError::Unavailable { .. })
        ));
        assert!(store.reset("list", StudyMode::Forward).is_err());
    }

    #[test]
    fn test_load_restores_word_id_and_ease_floor() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                "list:reverse",
                r#"{"w9":{"interval":3,"repetitions":3,"easeFactor":0.9,"nextReview":0,"lastQuality":1}}"#,
            )
            .unwrap();
        let store = CardStateStore::new(storage);

        let states = store.load("list", StudyMode::Reverse);
        let state = &states["w9"];
        assert_eq!(state.word_id, "w9");
        assert_eq!(state.ease_factor, MIN_EASE_FACTOR);
        assert_eq!(state.last_quality, Some(Quality::Hard));
    }

    #[test]
    fn test_reset_only_clears_its_own_key() {
        let mut store = CardStateStore::new(MemoryStorage::new());
        let states = sample_states();
        store.save("a", StudyMode::Forward, &states).unwrap();
        store.save("a", StudyMode::Reverse, &states).unwrap();
        store.save("b", StudyMode::Forward, &states).unwrap();

        store.reset("a", StudyMode::Forward).unwrap();

        assert!(store.load("a", StudyMode::Forward).is_empty());
        assert_eq!(store.load("a", StudyMode::Reverse), states);
        assert_eq!(store.load("b", StudyMode::Forward), states);
        assert_eq!(store.storage().keys(), vec!["a:reverse", "b:forward"]);
    }
}
