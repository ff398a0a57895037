use crate::ui_state::UiState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub track_list: Rect,
    pub now_playing: Rect,
    pub waveform: Rect,
    pub buffer_line: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, state: &UiState) -> Self {
        let wf_height = match (state.view.waveform.bins.is_empty(), area.height > 25) {
            (true, _) => 0,
            (false, true) => 8,
            (false, false) => 5,
        };

        let [upper_block, waveform, buffer_line] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(wf_height),
                Constraint::Length(1),
            ])
            .areas(area);

        let [track_list, _, now_playing] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(55),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(upper_block);

        AppLayout {
            track_list,
            now_playing,
            waveform,
            buffer_line,
        }
    }
}
