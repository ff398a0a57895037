use super::TrackStore;
use crate::{
    domain::{CoverArt, FileType, Track, TrackMetadata, UNKNOWN_FIELD, track_key},
    error::ImportError,
};
use lofty::prelude::*;
use std::{path::Path, sync::Arc};

/// Read an audio file from disk and build a storable [`Track`].
///
/// Tags that are missing fall back to the file name (title) or
/// [`UNKNOWN_FIELD`] (artist, album). The first embedded picture becomes the
/// cover.
pub fn read_track<P: AsRef<Path>>(path: P) -> Result<Track, ImportError> {
    let path = path.as_ref();
    let io_err = |source| ImportError::Io {
        path: path.display().to_string(),
        source,
    };

    let audio = std::fs::read(path).map_err(io_err)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .map(FileType::from)
        .unwrap_or_default();

    let tagged = lofty::read_from_path(path)?;
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());

    let text = |value: Option<std::borrow::Cow<'_, str>>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let metadata = match tag {
        Some(tag) => TrackMetadata {
            title: text(tag.title()).unwrap_or_else(|| file_name.clone()),
            artist: text(tag.artist()).unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            album: text(tag.album()).unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            cover: tag.pictures().first().map(|pic| CoverArt {
                bytes: Arc::from(pic.data()),
                mime_type: pic
                    .mime_type()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            }),
        },
        None => TrackMetadata::new(file_name.clone()),
    };

    Ok(Track {
        key: track_key(&file_name, audio.len() as u64),
        audio: Arc::from(audio),
        format,
        metadata,
    })
}

/// Import a file into `store`. Returns the stored track.
pub fn import_track<P: AsRef<Path>>(
    store: &mut dyn TrackStore,
    path: P,
) -> Result<Track, ImportError> {
    let track = read_track(&path)?;
    store.set(&track)?;
    log::info!(
        "saved: {} ({})",
        track.metadata.title,
        path.as_ref().display()
    );
    Ok(track)
}
