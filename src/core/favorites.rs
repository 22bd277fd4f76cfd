use std::collections::HashSet;

use crate::services::storage::{StorageError, StoragePort};

/// Storage key the favorites set is persisted under.
pub const FAVORITES_KEY: &str = "favorites";

/// The session's favorited dog IDs, persisted across restarts.
///
/// Only IDs are tracked; full records are re-resolved from the catalog when
/// they are needed. Every mutation is flushed to storage before it returns,
/// so the persisted set never lags the in-memory one.
pub struct FavoritesStore {
    ids: HashSet<String>,
    storage: Box<dyn StoragePort>,
}

impl FavoritesStore {
    /// Load the persisted set.
    ///
    /// Starts empty when nothing was stored yet, and also when the stored
    /// document is unreadable or corrupt. That state is logged, never fatal.
    pub fn load(storage: Box<dyn StoragePort>) -> Self {
        let ids = match storage.read(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => list.into_iter().collect(),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt favorites document: {}", e);
                    HashSet::new()
                }
            },
            Ok(None) => HashSet::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites: {}", e);
                HashSet::new()
            }
        };

        tracing::debug!("Loaded {} favorites", ids.len());

        Self { ids, storage }
    }

    /// Flip membership for `id`, returning whether it is a favorite now.
    ///
    /// The in-memory change survives a failed flush; the error is still
    /// returned so callers can report the persistence problem.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StorageError> {
        let now_favorite = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };

        self.flush()?;
        Ok(now_favorite)
    }

    /// Remove every favorite.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.ids.clear();
        self.flush()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Read-only view of the membership set.
    pub fn all(&self) -> &HashSet<String> {
        &self.ids
    }

    /// IDs in sorted order, for stable request bodies and display.
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn flush(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.sorted_ids()).unwrap();
        self.storage.write(FAVORITES_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{JsonFileStorage, MemoryStorage};

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = FavoritesStore::load(Box::new(MemoryStorage::default()));

        assert!(favorites.toggle("dog-1").unwrap());
        assert!(favorites.contains("dog-1"));
        assert_eq!(favorites.len(), 1);

        assert!(!favorites.toggle("dog-1").unwrap());
        assert!(!favorites.contains("dog-1"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_persisted_document_is_sorted_json() {
        let storage = MemoryStorage::default();
        let mut favorites = FavoritesStore::load(Box::new(storage));
        favorites.toggle("zeta").unwrap();
        favorites.toggle("alpha").unwrap();

        assert_eq!(favorites.sorted_ids(), vec!["alpha", "zeta"]);
        assert_eq!(favorites.all().len(), 2);
        assert!(favorites.all().contains("zeta"));
    }

    #[test]
    fn test_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let storage = JsonFileStorage::new(dir.path());
            let mut favorites = FavoritesStore::load(Box::new(storage));
            favorites.toggle("dog-2").unwrap();
            favorites.toggle("dog-1").unwrap();
        }

        let reloaded = FavoritesStore::load(Box::new(JsonFileStorage::new(dir.path())));
        assert_eq!(reloaded.sorted_ids(), vec!["dog-1", "dog-2"]);

        let raw = std::fs::read_to_string(dir.path().join("favorites.json")).unwrap();
        assert_eq!(raw, r#"["dog-1","dog-2"]"#);
    }

    #[test]
    fn test_corrupt_document_starts_empty() {
        let storage = MemoryStorage::default();
        storage.write(FAVORITES_KEY, "{not json").unwrap();

        let favorites = FavoritesStore::load(Box::new(storage));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_clear_empties_set_and_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut favorites = FavoritesStore::load(Box::new(JsonFileStorage::new(dir.path())));
        favorites.toggle("dog-1").unwrap();

        favorites.clear().unwrap();
        assert!(favorites.is_empty());

        let raw = std::fs::read_to_string(dir.path().join("favorites.json")).unwrap();
        assert_eq!(raw, "[]");
    }

    #[test]
    fn test_failed_flush_keeps_in_memory_change() {
        struct BrokenStorage;

        impl StoragePort for BrokenStorage {
            fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Ok(None)
            }

            fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
                Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )))
            }
        }

        let mut favorites = FavoritesStore::load(Box::new(BrokenStorage));
        assert!(favorites.toggle("dog-1").is_err());
        assert!(favorites.contains("dog-1"));
    }
}
