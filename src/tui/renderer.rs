use super::{
    AppLayout, BufferLine, ErrorMsg, ImportPopup, NowPlaying, TrackTable, VolumePopover, Waveform,
};
use crate::ui_state::{PopupType, UiState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    widgets::{Widget, *},
};

pub fn render(f: &mut Frame, state: &mut UiState) {
    let layout = AppLayout::new(f.area(), state);

    Block::new()
        .bg(state.theme.bg_global)
        .render(f.area(), f.buffer_mut());

    TrackTable.render(layout.track_list, f.buffer_mut(), state);
    NowPlaying.render(layout.now_playing, f.buffer_mut(), state);
    Waveform.render(layout.waveform, f.buffer_mut(), state);
    BufferLine.render(layout.buffer_line, f.buffer_mut(), state);

    if state.volume_popover_open() {
        let rect = anchored_rect(layout.now_playing, 30, 3);
        Clear.render(rect, f.buffer_mut());
        VolumePopover.render(rect, f.buffer_mut(), state);
    }

    if state.popup.is_open() {
        let popup_rect = match &state.popup.current {
            PopupType::Error(_) => centered_rect(40, 30, f.area()),
            _ => centered_rect(50, 20, f.area()),
        };

        Clear.render(popup_rect, f.buffer_mut());
        match &state.popup.current {
            PopupType::Import => ImportPopup.render(popup_rect, f.buffer_mut(), state),
            PopupType::Error(_) => ErrorMsg.render(popup_rect, f.buffer_mut(), state),
            PopupType::None => (),
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Small box pinned to the bottom of `r`, above the transport line.
fn anchored_rect(r: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);

    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + r.height - height,
        width,
        height,
    }
}
