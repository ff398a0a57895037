use rusqlite::{
    Result as RusqliteResult, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef},
};
use std::fmt::Display;

#[allow(clippy::upper_case_acronyms)]
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
pub enum FileType {
    MP3 = 1,
    M4A = 2,
    OGG = 3,
    WAV = 4,
    FLAC = 5,
    #[default]
    UNKNOWN = 0,
}

impl From<&str> for FileType {
    fn from(str: &str) -> Self {
        match str.to_ascii_lowercase().as_str() {
            "mp3" | "mpga" | "bit" => Self::MP3,
            "m4a" | "m4b" | "m4p" | "m4r" | "mp4" | "aac" => Self::M4A,
            "ogg" | "oga" | "opus" => Self::OGG,
            "flac" => Self::FLAC,
            "wav" | "wave" => Self::WAV,
            _ => Self::UNKNOWN,
        }
    }
}

impl FromSql for FileType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(FileType::from_i64(i)),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for FileType {
    fn to_sql(&self) -> RusqliteResult<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(Value::Integer(self.to_i64())))
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            FileType::MP3 => write!(f, "ᵐᵖ³"),
            FileType::M4A => write!(f, "ᵐ⁴ᵃ"),
            FileType::OGG => write!(f, "ᵒᵍᵍ"),
            FileType::WAV => write!(f, "ʷᵃᵛ"),
            FileType::FLAC => write!(f, "ᶠˡᵃᶜ"),
            FileType::UNKNOWN => write!(f, "???"),
        }
    }
}

impl FileType {
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => Self::MP3,
            2 => Self::M4A,
            3 => Self::OGG,
            4 => Self::WAV,
            5 => Self::FLAC,
            _ => Self::UNKNOWN,
        }
    }

    pub fn to_i64(&self) -> i64 {
        *self as i64
    }

    /// Format hint handed to the decoder so it can skip probing.
    pub fn decoder_hint(&self) -> Option<&'static str> {
        match self {
            FileType::MP3 => Some("mp3"),
            FileType::M4A => Some("audio/mp4"),
            FileType::OGG => Some("audio/ogg"),
            FileType::WAV => Some("wav"),
            FileType::FLAC => Some("flac"),
            FileType::UNKNOWN => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(FileType::from("MP3"), FileType::MP3);
        assert_eq!(FileType::from("m4b"), FileType::M4A);
        assert_eq!(FileType::from("xyz"), FileType::UNKNOWN);
    }

    #[test]
    fn integer_mapping_is_stable() {
        for ft in [FileType::MP3, FileType::M4A, FileType::OGG, FileType::WAV, FileType::FLAC] {
            assert_eq!(FileType::from_i64(ft.to_i64()), ft);
        }
        assert_eq!(FileType::from_i64(99), FileType::UNKNOWN);
    }
}
