use thiserror::Error;

/// Failures raised by a [`TrackStore`](crate::library::TrackStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("track store is closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// The store could not be read or written. The current action is aborted.
    #[error("track store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The store no longer holds the requested key.
    #[error("track {0} is no longer in the library")]
    TrackMissing(String),

    #[error("playback engine error: {0}")]
    Engine(String),

    #[error("could not decode cover art: {0}")]
    CoverDecode(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read tags: {0}")]
    Tags(#[from] lofty::error::LoftyError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
