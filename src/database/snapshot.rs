use super::queries::{GET_SESSION_STATE, SET_SESSION_STATE};
use crate::{Database, error::StoreError};
use rusqlite::{OptionalExtension, params};

const VOLUME_KEY: &str = "volume";
const REPEAT_KEY: &str = "repeat";

/// Session-level settings that outlive a single run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub volume: Option<f32>,
    pub repeat: Option<bool>,
}

impl Database {
    pub fn get_session_state(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(GET_SESSION_STATE, params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?)
    }

    pub fn save_session_snapshot(&mut self, volume: f32, repeat: bool) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(SET_SESSION_STATE)?;
            stmt.execute(params![VOLUME_KEY, volume.to_string()])?;
            stmt.execute(params![REPEAT_KEY, repeat.to_string()])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Values that are missing or cannot be parsed come back as `None`.
    pub fn load_session_snapshot(&self) -> Result<SessionSnapshot, StoreError> {
        let volume = self
            .get_session_state(VOLUME_KEY)?
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| v.is_finite());
        let repeat = self
            .get_session_state(REPEAT_KEY)?
            .and_then(|v| v.parse::<bool>().ok());

        Ok(SessionSnapshot { volume, repeat })
    }
}
