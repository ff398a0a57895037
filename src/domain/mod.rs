mod filetype;
mod track;

pub use filetype::FileType;
pub use track::{CoverArt, Track, TrackMetadata, UNKNOWN_FIELD, track_key};
