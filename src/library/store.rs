use crate::{
    domain::{Track, TrackMetadata},
    error::StoreError,
};
use indexmap::IndexMap;

/// Key/value persistence for tracks.
///
/// `iterate` visits entries in insertion order and only hands out metadata;
/// audio bytes are loaded on demand through `get`.
pub trait TrackStore {
    fn get(&self, key: &str) -> Result<Option<Track>, StoreError>;
    fn iterate(&self, visit: &mut dyn FnMut(&str, &TrackMetadata)) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    fn set(&mut self, track: &Track) -> Result<(), StoreError>;
}

/// Store kept entirely in memory. Insertion order is preserved across
/// overwrites and removals.
#[derive(Default)]
pub struct MemoryStore {
    tracks: IndexMap<String, Track>,
    closed: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later call fails with [`StoreError::Closed`].
    pub fn close(&mut self) {
        self.closed = true
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        match self.closed {
            true => Err(StoreError::Closed),
            false => Ok(()),
        }
    }
}

impl TrackStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Track>, StoreError> {
        self.ensure_open()?;
        Ok(self.tracks.get(key).cloned())
    }

    fn iterate(&self, visit: &mut dyn FnMut(&str, &TrackMetadata)) -> Result<(), StoreError> {
        self.ensure_open()?;
        for (key, track) in &self.tracks {
            visit(key, &track.metadata);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.tracks.shift_remove(key);
        Ok(())
    }

    fn set(&mut self, track: &Track) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.tracks.insert(track.key.clone(), track.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileType;
    use std::sync::Arc;

    fn track(key: &str) -> Track {
        Track {
            key: key.to_string(),
            audio: Arc::from(vec![0u8; 4]),
            format: FileType::WAV,
            metadata: TrackMetadata::new(key),
        }
    }

    fn keys(store: &MemoryStore) -> Vec<String> {
        let mut keys = vec![];
        store
            .iterate(&mut |key, _| keys.push(key.to_string()))
            .unwrap();
        keys
    }

    #[test]
    fn iterate_follows_insertion_order() {
        let mut store = MemoryStore::new();
        for k in ["c", "a", "b"] {
            store.set(&track(k)).unwrap();
        }
        assert_eq!(keys(&store), ["c", "a", "b"]);
    }

    #[test]
    fn overwrite_keeps_position_and_remove_keeps_order() {
        let mut store = MemoryStore::new();
        for k in ["a", "b", "c"] {
            store.set(&track(k)).unwrap();
        }
        let mut replaced = track("a");
        replaced.metadata.title = "Replaced".into();
        store.set(&replaced).unwrap();
        store.remove("b").unwrap();

        assert_eq!(keys(&store), ["a", "c"]);
        assert_eq!(store.get("a").unwrap().unwrap().metadata.title, "Replaced");
        assert!(store.get("b").unwrap().is_none());
    }

    #[test]
    fn closed_store_rejects_everything() {
        let mut store = MemoryStore::new();
        store.close();
        assert!(matches!(store.get("a"), Err(StoreError::Closed)));
        assert!(matches!(store.iterate(&mut |_, _| {}), Err(StoreError::Closed)));
        assert!(matches!(store.set(&track("a")), Err(StoreError::Closed)));
    }
}
