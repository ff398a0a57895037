mod import;
mod store;
mod track_list;

pub use import::{import_track, read_track};
pub use store::{MemoryStore, TrackStore};
pub use track_list::{Direction, TrackEntry, TrackListModel, TrackListSnapshot};
