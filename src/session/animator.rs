use crate::player::Playhead;
use serde::{Deserialize, Serialize};

pub const NEUTRAL_SCALE: f32 = 1.0;

/// How strongly the cover reacts to the signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PulseMode {
    #[default]
    Subtle,
    Bold,
}

impl PulseMode {
    pub fn base_scale(self) -> f32 {
        match self {
            PulseMode::Subtle => 0.95,
            PulseMode::Bold => 0.9,
        }
    }

    pub fn sensitivity(self) -> f32 {
        match self {
            PulseMode::Subtle => 0.1,
            PulseMode::Bold => 0.6,
        }
    }
}

/// Identifies one scheduled frame. A new id is issued every time the
/// animator rearms itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest(u64);

/// Per-frame cover pulse driven by the decoded waveform.
///
/// At most one frame request is pending. Each call to [`frame`](Self::frame)
/// consumes it and schedules the next, so the loop keeps running while armed
/// even when there is nothing to react to.
pub struct AmplitudeAnimator {
    mode: PulseMode,
    pending: Option<FrameRequest>,
    next_request: u64,
    scale: f32,
}

impl AmplitudeAnimator {
    pub fn new(mode: PulseMode) -> Self {
        AmplitudeAnimator {
            mode,
            pending: None,
            next_request: 1,
            scale: NEUTRAL_SCALE,
        }
    }

    fn schedule(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_request);
        self.next_request += 1;
        self.pending = Some(request);
        request
    }

    /// Cancel whatever frame is pending and arm a fresh loop.
    pub fn start(&mut self) -> FrameRequest {
        self.pending = None;
        self.schedule()
    }

    pub fn stop(&mut self) -> f32 {
        self.pending = None;
        self.scale = NEUTRAL_SCALE;
        self.scale
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Run the pending frame. Returns the scale to apply, or `None` when the
    /// animator is not armed.
    pub fn frame(&mut self, playhead: Option<Playhead>, samples: Option<&[f32]>) -> Option<f32> {
        self.pending?;

        self.scale = match (playhead, samples) {
            (Some(p), Some(samples))
                if p.playing && !p.seeking && !p.duration.is_zero() && !samples.is_empty() =>
            {
                let progress = p.current.as_secs_f32() / p.duration.as_secs_f32();
                pulse_scale(samples, progress, self.mode)
            }
            _ => NEUTRAL_SCALE,
        };

        self.schedule();
        Some(self.scale)
    }
}

/// `base + |sample| * sensitivity`, sampled at `floor(progress * len)`.
/// Positions past the end read as silence.
pub fn pulse_scale(samples: &[f32], progress: f32, mode: PulseMode) -> f32 {
    let idx = (progress.max(0.0) * samples.len() as f32).floor() as usize;
    let amplitude = samples
        .get(idx)
        .map(|s| s.abs())
        .filter(|a| a.is_finite())
        .unwrap_or(0.0);

    mode.base_scale() + amplitude * mode.sensitivity()
}
