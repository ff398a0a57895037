use super::UiState;
use crate::{
    library::{TrackEntry, TrackListSnapshot, TrackStore},
    player::{EngineConfig, PlaybackEngine, Playhead},
    session::{BoundControls, SessionController, SessionState},
};
use std::sync::Arc;

/// Number of columns the waveform is reduced to.
pub const WAVEFORM_BINS: usize = 400;

/// What the widgets read each frame, copied out of the session controller.
#[derive(Default)]
pub struct SessionView {
    pub tracks: Vec<TrackEntry>,
    pub controls: Option<BoundControls>,
    pub state: SessionState,
    pub active_key: Option<String>,
    pub volume: f32,
    pub repeat: bool,
    pub playhead: Option<Playhead>,
    pub waveform: WaveformView,
    pub engine: EngineConfig,
}

/// Peak envelope of the playing track. Only rebuilt when the decoded
/// samples change.
#[derive(Default)]
pub struct WaveformView {
    source: Option<Arc<[f32]>>,
    pub bins: Vec<f32>,
}

impl WaveformView {
    pub fn update(&mut self, samples: Option<Arc<[f32]>>) {
        let unchanged = match (&self.source, &samples) {
            (Some(old), Some(new)) => Arc::ptr_eq(old, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.bins = samples
            .as_deref()
            .map(|s| peak_envelope(s, WAVEFORM_BINS))
            .unwrap_or_default();
        self.source = samples;
    }
}

/// Reduce `samples` to at most `bins` normalised peaks in `0..=1`.
pub fn peak_envelope(samples: &[f32], bins: usize) -> Vec<f32> {
    if samples.is_empty() || bins == 0 {
        return Vec::new();
    }

    let chunk = samples.len().div_ceil(bins);
    let peaks: Vec<f32> = samples
        .chunks(chunk)
        .map(|c| c.iter().fold(0.0f32, |acc, s| acc.max(s.abs())))
        .collect();

    let max = peaks.iter().copied().fold(0.0f32, f32::max);
    match max > 0.0 {
        true => peaks.into_iter().map(|p| p / max).collect(),
        false => peaks,
    }
}

impl UiState {
    pub fn sync_tracks(&mut self, snapshot: &TrackListSnapshot) {
        self.view.tracks = snapshot.iter().cloned().collect();
        self.clamp_selection();
    }

    pub fn sync_session<E: PlaybackEngine, S: TrackStore>(
        &mut self,
        controller: &SessionController<E, S>,
    ) {
        let session = controller.session();
        let waveform = controller.waveform();

        self.view.controls = controller.controls().cloned();
        self.view.state = controller.state();
        self.view.active_key = session.active_key.clone();
        self.view.volume = session.volume;
        self.view.repeat = session.repeat_enabled;
        self.view.engine = controller.engine_config().clone();
        self.view.playhead = waveform.as_ref().map(|(_, playhead)| *playhead);
        self.view.waveform.update(waveform.map(|(samples, _)| samples));
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.view.active_key.as_deref() == Some(key)
    }
}
