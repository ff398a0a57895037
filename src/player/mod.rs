//! Playback engine contract.
//!
//! An engine owns decodable audio units, one per [`EngineHandle`]. Commands
//! against a destroyed handle are logged and ignored, never raised.
//! Lifecycle notifications are collected with [`PlaybackEngine::poll_events`].

mod backend_rodio;
#[cfg(test)]
pub(crate) mod testing;

pub use backend_rodio::RodioEngine;

use crate::{domain::FileType, error::SessionError};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineHandle(u64);

impl EngineHandle {
    pub(crate) fn new(id: u64) -> Self {
        EngineHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// Audio decoded, duration known. Sent once per successful load.
    Ready { duration: Duration },
    Play,
    Pause,
    TimeUpdate(Duration),
    /// Natural end of track. Never sent for a native loop restart.
    Finish,
    SeekStart,
    SeekEnd,
    Error(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarStyle {
    #[default]
    Bars,
    Line,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub wave_color: Color,
    pub progress_color: Color,
    pub cursor_visible: bool,
    pub bar_style: BarStyle,
    pub interactive: bool,
    pub looping: bool,
    pub initial_volume: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            wave_color: Color::White,
            progress_color: Color::Rgb(29, 185, 84),
            cursor_visible: false,
            bar_style: BarStyle::Bars,
            interactive: true,
            looping: false,
            initial_volume: 1.0,
        }
    }
}

/// The bytes a unit decodes from, resolved from a live audio resource.
#[derive(Clone)]
pub struct AudioSource {
    pub bytes: Arc<[u8]>,
    pub format: FileType,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Playhead {
    pub current: Duration,
    pub duration: Duration,
    pub playing: bool,
    pub seeking: bool,
}

pub trait PlaybackEngine {
    /// Start loading a new unit. The caller destroys any previous unit first.
    fn create(
        &mut self,
        source: AudioSource,
        config: &EngineConfig,
    ) -> Result<EngineHandle, SessionError>;

    /// Release everything held by `handle`. Returns once the unit's output
    /// is gone; `false` when there was nothing left to release.
    fn destroy(&mut self, handle: EngineHandle) -> bool;

    fn play(&mut self, handle: EngineHandle);
    fn pause(&mut self, handle: EngineHandle);
    fn toggle_play_pause(&mut self, handle: EngineHandle);
    /// Pause and rewind to the start.
    fn stop(&mut self, handle: EngineHandle);
    /// Jump to `fraction` (0..=1) of the track.
    fn seek(&mut self, handle: EngineHandle, fraction: f64);
    fn set_volume(&mut self, handle: EngineHandle, volume: f32);
    fn set_loop(&mut self, handle: EngineHandle, looping: bool);

    fn playhead(&self, handle: EngineHandle) -> Option<Playhead>;
    /// First channel of the decoded audio, once loaded.
    fn decoded_samples(&self, handle: EngineHandle) -> Option<Arc<[f32]>>;

    fn poll_events(&mut self) -> Vec<(EngineHandle, EngineEvent)>;
}
