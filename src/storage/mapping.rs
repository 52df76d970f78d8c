//! Persistent event id to page filename mapping.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::storage::LocalStorage;

/// Append-only `event_id -> filename` store backed by a JSON object file.
#[derive(Debug, Clone)]
pub struct MappingStore {
    storage: LocalStorage,
    key: String,
    entries: BTreeMap<String, String>,
    loaded: usize,
}

impl MappingStore {
    /// Load the store. A missing or unreadable file starts an empty store.
    pub async fn load(storage: LocalStorage, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = match storage.read_json::<BTreeMap<String, String>>(&key).await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                log::info!("No mapping file at {key}, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Failed to load mapping file {key}: {e}; starting empty");
                BTreeMap::new()
            }
        };
        let loaded = entries.len();

        Self {
            storage,
            key,
            entries,
            loaded,
        }
    }

    pub fn filename_for(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Insert unless `id` is already mapped. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, id: &str, filename: &str) -> bool {
        if self.entries.contains_key(id) {
            return false;
        }
        self.entries.insert(id.to_string(), filename.to_string());
        true
    }

    /// Entries present when the store was loaded.
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// Entries added since loading.
    pub fn added_count(&self) -> usize {
        self.entries.len() - self.loaded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write the whole mapping back atomically.
    pub async fn persist(&self) -> Result<()> {
        self.storage.write_json(&self.key, &self.entries).await?;
        log::info!(
            "Mapping saved to {}: {} existing + {} new = {} total",
            self.key,
            self.loaded_count(),
            self.added_count(),
            self.len()
        );
        Ok(())
    }
}
