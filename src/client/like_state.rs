use super::storage::{KeyValueStore, StorageError, StorageKey};

/// The locally persisted set of liked IDs
///
/// This is an independent copy of what the user liked; it is never
/// reconciled with the server's liked set.
pub struct LikeState<S> {
    store: S,
}

impl<S: KeyValueStore> LikeState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All liked IDs, empty when nothing or a JSON `null` has been stored
    pub fn liked_ids(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.store.get_item(StorageKey::LikedSeries)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str::<Option<Vec<String>>>(&raw)
            .map(Option::unwrap_or_default)
            .map_err(|source| StorageError::Corrupt {
                key: StorageKey::LikedSeries,
                source,
            })
    }

    pub fn is_liked(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.liked_ids()?.iter().any(|liked| liked == id))
    }

    /// Flips the liked marker for `id` and returns the new state
    ///
    /// The whole set is written back on every call.
    pub fn toggle_like(&self, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.liked_ids()?;

        let liked = if ids.iter().any(|liked| liked == id) {
            ids.retain(|liked| liked != id);
            false
        } else {
            ids.push(id.to_string());
            true
        };

        let raw = serde_json::to_string(&ids)?;
        self.store.set_item(StorageKey::LikedSeries, &raw)?;

        tracing::debug!(id, liked, total = ids.len(), "Like state toggled");
        Ok(liked)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
