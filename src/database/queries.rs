pub const GET_TRACK: &str = "
    SELECT
        key,
        title,
        artist,
        album,
        cover,
        cover_mime,
        audio,
        format
    FROM tracks
    WHERE key = ?1
";

pub const GET_ALL_TRACK_METADATA: &str = "
    SELECT
        key,
        title,
        artist,
        album,
        cover,
        cover_mime
    FROM tracks
    ORDER BY id ASC
";

// Upsert keeps the row id, so an overwritten track keeps its list position
pub const SET_TRACK: &str = "
    INSERT INTO tracks (
        key,
        title,
        artist,
        album,
        cover,
        cover_mime,
        audio,
        format
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(key) DO UPDATE SET
        title = excluded.title,
        artist = excluded.artist,
        album = excluded.album,
        cover = excluded.cover,
        cover_mime = excluded.cover_mime,
        audio = excluded.audio,
        format = excluded.format
";

pub const DELETE_TRACK: &str = "
    DELETE FROM tracks WHERE key = ?1
";

pub const SET_SESSION_STATE: &str = "
    INSERT OR REPLACE INTO session_state (key, value)
    VALUES (?1, ?2)
";

pub const GET_SESSION_STATE: &str = "
    SELECT value FROM session_state WHERE key = ?1
";
