mod display_state;
mod pane;
mod popup;
mod session_view;
mod theme;
mod ui_state;

pub use display_state::DisplayState;
pub use pane::{Mode, Pane};
pub use popup::PopupType;
pub use session_view::{SessionView, WAVEFORM_BINS, WaveformView, peak_envelope};
pub use ui_state::UiState;

pub use theme::*;

fn new_textarea(placeholder: &str) -> tui_textarea::TextArea<'static> {
    let mut input = tui_textarea::TextArea::default();
    input.set_cursor_line_style(ratatui::style::Style::default());
    input.set_placeholder_text(format!(" {placeholder}: "));

    input
}
