use super::FileType;
use std::sync::Arc;
use xxhash_rust::xxh3::xxh3_64;

pub const UNKNOWN_FIELD: &str = "Unknown";

/// A stored track. Immutable once written to the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub key: String,
    pub audio: Arc<[u8]>,
    pub format: FileType,
    pub metadata: TrackMetadata,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: Option<CoverArt>,
}

/// Embedded picture exactly as it was found in the file's tags.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverArt {
    pub bytes: Arc<[u8]>,
    pub mime_type: String,
}

impl TrackMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        TrackMetadata {
            title: title.into(),
            artist: UNKNOWN_FIELD.to_string(),
            album: UNKNOWN_FIELD.to_string(),
            cover: None,
        }
    }
}

/// Stable key for a track, derived from its file name and byte size.
///
/// Re-importing the same file yields the same key, so the store entry is
/// overwritten rather than duplicated.
pub fn track_key(file_name: &str, size: u64) -> String {
    let mut data = Vec::with_capacity(file_name.len() + 8);

    data.extend_from_slice(file_name.as_bytes());
    data.extend_from_slice(&size.to_le_bytes());

    format!("{:016x}", xxh3_64(&data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_for_same_name_and_size() {
        assert_eq!(track_key("song.mp3", 1024), track_key("song.mp3", 1024));
        assert_eq!(track_key("song.mp3", 1024).len(), 16);
    }

    #[test]
    fn key_changes_with_name_or_size() {
        let base = track_key("song.mp3", 1024);
        assert_ne!(base, track_key("song.mp3", 1025));
        assert_ne!(base, track_key("other.mp3", 1024));
    }

    #[test]
    fn metadata_defaults_to_unknown() {
        let meta = TrackMetadata::new("Intro");
        assert_eq!(meta.artist, UNKNOWN_FIELD);
        assert_eq!(meta.album, UNKNOWN_FIELD);
        assert!(meta.cover.is_none());
    }
}
