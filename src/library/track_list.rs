use super::TrackStore;
use crate::{domain::TrackMetadata, error::StoreError};

#[derive(Clone, Debug, PartialEq)]
pub struct TrackEntry {
    pub key: String,
    pub metadata: TrackMetadata,
}

/// Point-in-time read of every stored track, in store order.
#[derive(Clone, Debug, Default)]
pub struct TrackListSnapshot {
    entries: Vec<TrackEntry>,
}

impl TrackListSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&TrackEntry> {
        self.entries.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackEntry> {
        self.entries.iter()
    }

    /// Position of `key`, or `None` if it was removed since the last refresh.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Neighbour of `idx` with wraparound in both directions.
    /// Returns `None` only for an empty list.
    pub fn step(&self, idx: usize, direction: Direction) -> Option<usize> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }

        let idx = idx % len;
        Some(match direction {
            Direction::Next => (idx + 1) % len,
            Direction::Previous => (idx + len - 1) % len,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// In-memory view of the store used for navigation.
///
/// The snapshot is rebuilt from scratch on every refresh so it never drifts
/// from the store when tracks are added or removed underneath it.
#[derive(Default)]
pub struct TrackListModel {
    snapshot: TrackListSnapshot,
}

impl TrackListModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// On failure the previous snapshot is left untouched.
    pub fn refresh(&mut self, store: &dyn TrackStore) -> Result<&TrackListSnapshot, StoreError> {
        let mut entries = Vec::new();
        store.iterate(&mut |key, metadata| {
            entries.push(TrackEntry {
                key: key.to_string(),
                metadata: metadata.clone(),
            })
        })?;

        self.snapshot = TrackListSnapshot { entries };
        Ok(&self.snapshot)
    }

    pub fn snapshot(&self) -> &TrackListSnapshot {
        &self.snapshot
    }
}
