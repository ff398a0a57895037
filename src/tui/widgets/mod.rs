mod buffer_line;
mod error;
mod import;
mod now_playing;
mod tracklist;
mod volume;
mod waveform;

pub use buffer_line::BufferLine;
pub use error::ErrorMsg;
pub use import::ImportPopup;
pub use now_playing::NowPlaying;
pub use tracklist::TrackTable;
pub use volume::VolumePopover;
pub use waveform::Waveform;

const DUR_WIDTH: u16 = 5;
const MUSIC_NOTE: &str = "♫";
const DECORATOR: &str = "✧";
const WAVEFORM_WIDGET_HEIGHT: f64 = 50.0;

static POPUP_PADDING: ratatui::widgets::Padding = ratatui::widgets::Padding {
    left: 2,
    right: 2,
    top: 1,
    bottom: 1,
};
