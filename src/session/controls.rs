use super::animator::NEUTRAL_SCALE;
use crate::domain::Track;
use image::RgbaImage;
use std::sync::Arc;

/// Glyph shown on the play/pause control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportIcon {
    #[default]
    Play,
    Pause,
    Loading,
}

impl TransportIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            TransportIcon::Play => "▶",
            TransportIcon::Pause => "⏸",
            TransportIcon::Loading => "…",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub enum CoverView {
    #[default]
    Placeholder,
    Image(Arc<RgbaImage>),
}

/// Interactions reported by the UI while the controller is subscribed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    InsidePopover,
    OutsidePopover,
}

/// Outside-interaction listener for the volume popover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription(pub(crate) u64);

/// Widgets of the now-playing panel, bound to one track when the panel is
/// rendered. The controller is the only writer; the UI only reads.
#[derive(Clone, Debug)]
pub struct BoundControls {
    pub key: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: CoverView,
    pub cover_scale: f32,
    pub elapsed: String,
    pub total: String,
    pub transport: TransportIcon,
    pub repeat: bool,
    pub volume: f32,
    pub volume_popover: bool,
}

impl BoundControls {
    pub(crate) fn bind(track: &Track, cover: CoverView, volume: f32, repeat: bool) -> Self {
        BoundControls {
            key: track.key.clone(),
            title: track.metadata.title.clone(),
            artist: track.metadata.artist.clone(),
            album: track.metadata.album.clone(),
            cover,
            cover_scale: NEUTRAL_SCALE,
            elapsed: format_time(0.0),
            total: format_time(0.0),
            transport: TransportIcon::Loading,
            repeat,
            volume,
            volume_popover: false,
        }
    }

    pub(crate) fn reset_time(&mut self) {
        self.elapsed = format_time(0.0);
        self.transport = TransportIcon::Play;
        self.cover_scale = NEUTRAL_SCALE;
    }
}

/// `m:ss`, seconds floored. Negative or non-finite input reads as zero.
pub fn format_time(secs: f64) -> String {
    let total = match secs.is_finite() && secs > 0.0 {
        true => secs.floor() as u64,
        false => 0,
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(0.0), "0:00");
    }

    #[test]
    fn floors_fractional_seconds() {
        assert_eq!(format_time(59.99), "0:59");
        assert_eq!(format_time(600.4), "10:00");
    }

    #[test]
    fn garbage_reads_as_zero() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }
}
