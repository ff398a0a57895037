use anyhow::{Result, anyhow};
use ratatui::crossterm::{
    ExecutableCommand,
    cursor::MoveToColumn,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

pub mod app_core;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod key_handler;
pub mod library;
pub mod player;
pub mod session;
pub mod tui;
pub mod ui_state;

pub use database::Database;
pub use session::SessionController;

// ~30fps
pub const REFRESH_RATE: u64 = 33;

pub const CONFIG_DIRECTORY: &str = "Resonance";

/// `<config dir>/Resonance`, created on first use.
pub fn app_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Config folder not present on system!"))?
        .join(CONFIG_DIRECTORY);

    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn truncate_at_last_space(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }

    let byte_limit = s
        .char_indices()
        .map(|(i, _)| i)
        .nth(limit)
        .unwrap_or(s.len());

    match s[..byte_limit].rfind(' ') {
        Some(last_space) => {
            let mut truncated = s[..last_space].to_string();
            truncated.push('…');
            truncated
        }
        None => {
            let char_boundary = s[..byte_limit]
                .char_indices()
                .map(|(i, _)| i)
                .last()
                .unwrap_or(0);

            let mut truncated = s[..char_boundary].to_string();
            truncated.push('…');
            truncated
        }
    }
}

pub fn overwrite_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout
        .execute(MoveToColumn(0))?
        .execute(Clear(ClearType::CurrentLine))?
        .execute(Print(message))?;
    stdout.flush()
}

pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    if path_str == "~" {
        return Err(anyhow!("Please provide a path to an audio file, not the home directory!"));
    }

    if path_str.starts_with("~/") || path_str.starts_with("~\\") {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory!"))?;
        return Ok(home.join(&path_str[2..]));
    }

    Err(anyhow!("Error reading path with tilde (~)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_word_boundary() {
        assert_eq!(truncate_at_last_space("short", 10), "short");
        assert_eq!(truncate_at_last_space("hello big world", 10), "hello big…");
    }

    #[test]
    fn tilde_paths() {
        assert_eq!(expand_tilde("/tmp/a.mp3").unwrap(), PathBuf::from("/tmp/a.mp3"));
        assert!(expand_tilde("~").is_err());
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/a.mp3").unwrap(), home.join("a.mp3"));
        }
    }
}
