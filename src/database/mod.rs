use crate::{
    app_dir,
    domain::{CoverArt, FileType, Track, TrackMetadata},
    error::StoreError,
    library::TrackStore,
};
use anyhow::Result;
use queries::*;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::{path::Path, sync::Arc};

mod queries;
mod snapshot;
mod tables;

pub use snapshot::SessionSnapshot;

const DATABASE_FILENAME: &str = "resonance.db";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database in the user's config directory, creating it on first run.
    pub fn open() -> Result<Self> {
        Ok(Self::open_at(app_dir()?.join(DATABASE_FILENAME))?)
    }

    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        let mut db = Database { conn };
        db.create_tables()?;

        Ok(db)
    }

    fn create_tables(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(tables::CREATE_TABLES)?;
        tx.commit()?;

        Ok(())
    }
}

// ===================
//   TRACK OPERATIONS
// ===================

impl TrackStore for Database {
    fn get(&self, key: &str) -> Result<Option<Track>, StoreError> {
        let mut stmt = self.conn.prepare_cached(GET_TRACK)?;

        let track = stmt
            .query_row(params![key], |row| {
                let audio: Vec<u8> = row.get("audio")?;
                Ok(Track {
                    key: row.get("key")?,
                    audio: Arc::from(audio),
                    format: row
                        .get::<_, Option<FileType>>("format")?
                        .unwrap_or_default(),
                    metadata: read_metadata(row)?,
                })
            })
            .optional()?;

        Ok(track)
    }

    fn iterate(&self, visit: &mut dyn FnMut(&str, &TrackMetadata)) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare_cached(GET_ALL_TRACK_METADATA)?;
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            let key: String = row.get("key")?;
            let metadata = read_metadata(row)?;
            visit(&key, &metadata);
        }

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn.execute(DELETE_TRACK, params![key])?;
        Ok(())
    }

    fn set(&mut self, track: &Track) -> Result<(), StoreError> {
        let meta = &track.metadata;
        let (cover, cover_mime) = match &meta.cover {
            Some(c) => (Some(&c.bytes[..]), Some(c.mime_type.as_str())),
            None => (None, None),
        };

        self.conn.execute(
            SET_TRACK,
            params![
                track.key,
                meta.title,
                meta.artist,
                meta.album,
                cover,
                cover_mime,
                &track.audio[..],
                track.format,
            ],
        )?;

        Ok(())
    }
}

fn read_metadata(row: &Row<'_>) -> rusqlite::Result<TrackMetadata> {
    let cover: Option<Vec<u8>> = row.get("cover")?;
    let cover_mime: Option<String> = row.get("cover_mime")?;

    Ok(TrackMetadata {
        title: row.get("title")?,
        artist: row.get("artist")?,
        album: row.get("album")?,
        cover: cover.map(|bytes| CoverArt {
            bytes: Arc::from(bytes),
            mime_type: cover_mime.unwrap_or_default(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(key: &str, title: &str) -> Track {
        Track {
            key: key.to_string(),
            audio: Arc::from(vec![1u8, 2, 3, 4]),
            format: FileType::FLAC,
            metadata: TrackMetadata {
                title: title.to_string(),
                artist: "Artist".into(),
                album: "Album".into(),
                cover: Some(CoverArt {
                    bytes: Arc::from(vec![9u8, 9, 9]),
                    mime_type: "image/png".into(),
                }),
            },
        }
    }

    fn open_temp() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn set_then_get_returns_full_track() {
        let (_dir, mut db) = open_temp();
        let t = track("k1", "First");
        db.set(&t).unwrap();

        assert_eq!(db.get("k1").unwrap(), Some(t));
        assert_eq!(db.get("nope").unwrap(), None);
    }

    #[test]
    fn iterate_keeps_insertion_order_across_overwrite() {
        let (_dir, mut db) = open_temp();
        db.set(&track("b", "B")).unwrap();
        db.set(&track("a", "A")).unwrap();
        db.set(&track("b", "B again")).unwrap();

        let mut seen = vec![];
        db.iterate(&mut |key, meta| seen.push((key.to_string(), meta.title.clone())))
            .unwrap();

        assert_eq!(
            seen,
            [("b".to_string(), "B again".to_string()), ("a".into(), "A".into())]
        );
    }

    #[test]
    fn remove_deletes_entry() {
        let (_dir, mut db) = open_temp();
        db.set(&track("a", "A")).unwrap();
        db.remove("a").unwrap();
        db.remove("a").unwrap();

        assert_eq!(db.get("a").unwrap(), None);
    }

    #[test]
    fn track_without_cover_round_trips_as_none() {
        let (_dir, mut db) = open_temp();
        let mut t = track("a", "A");
        t.metadata.cover = None;
        db.set(&t).unwrap();

        assert_eq!(db.get("a").unwrap().unwrap().metadata.cover, None);
    }
}
