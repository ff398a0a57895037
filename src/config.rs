use crate::{
    app_dir,
    player::{BarStyle, EngineConfig},
    session::{PulseMode, SessionSettings},
};
use anyhow::Result;
use log::{info, warn};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer};
use std::{path::Path, str::FromStr};

const CONFIG_FILENAME: &str = "config.toml";

/// Contents of `config.toml`. Every key is optional.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub volume: f32,
    pub repeat: bool,
    pub pulse: PulseMode,
    pub waveform: WaveformSettings,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WaveformSettings {
    pub wave_color: ThemeColor,
    pub progress_color: ThemeColor,
    pub bar_style: BarStyle,
    pub cursor_visible: bool,
    pub interactive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            volume: 1.0,
            repeat: false,
            pulse: PulseMode::default(),
            waveform: WaveformSettings::default(),
        }
    }
}

impl Default for WaveformSettings {
    fn default() -> Self {
        let engine = EngineConfig::default();
        WaveformSettings {
            wave_color: ThemeColor(engine.wave_color),
            progress_color: ThemeColor(engine.progress_color),
            bar_style: engine.bar_style,
            cursor_visible: engine.cursor_visible,
            interactive: engine.interactive,
        }
    }
}

/// A color written as `#RRGGBB`, an ANSI index or a name like `lightblue`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeColor(pub Color);

impl<'de> Deserialize<'de> for ThemeColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        match s.to_lowercase().as_str() {
            "" | "none" => return Ok(ThemeColor(Color::Reset)),
            _ => {}
        }

        Color::from_str(&s)
            .map(ThemeColor)
            .map_err(serde::de::Error::custom)
    }
}

impl Settings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_str = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str::<Settings>(&file_str)?)
    }

    /// Read the user's config file. A missing or broken file yields defaults.
    pub fn load() -> Self {
        let path = match app_dir() {
            Ok(dir) => dir.join(CONFIG_FILENAME),
            Err(e) => {
                warn!("no config directory, using defaults: {e}");
                return Self::default();
            }
        };

        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            wave_color: self.waveform.wave_color.0,
            progress_color: self.waveform.progress_color.0,
            cursor_visible: self.waveform.cursor_visible,
            bar_style: self.waveform.bar_style,
            interactive: self.waveform.interactive,
            looping: false,
            initial_volume: self.volume,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            volume: self.volume,
            repeat: self.repeat,
            pulse: self.pulse,
            engine: self.engine_config(),
        }
    }
}
