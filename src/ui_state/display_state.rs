use super::{Mode, Pane, UiState};
use crate::key_handler::Director;
use ratatui::widgets::TableState;

pub struct DisplayState {
    mode: Mode,
    pub pane: Pane,
    pub table_pos: TableState,
}

impl DisplayState {
    pub fn new() -> Self {
        DisplayState {
            mode: Mode::Normal,
            pane: Pane::TrackList,
            table_pos: TableState::default().with_selected(0),
        }
    }
}

impl UiState {
    pub fn get_pane(&self) -> &Pane {
        &self.display_state.pane
    }

    pub fn set_pane(&mut self, pane: Pane) {
        self.display_state.pane = pane;
    }

    pub fn get_mode(&self) -> &Mode {
        &self.display_state.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.display_state.mode = mode
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.display_state
            .table_pos
            .selected()
            .filter(|idx| *idx < self.view.tracks.len())
    }

    pub fn scroll(&mut self, director: Director) {
        let len = self.view.tracks.len();
        if len == 0 {
            self.display_state.table_pos.select(None);
            return;
        }

        let current = self.display_state.table_pos.selected().unwrap_or(0);
        let new_pos = match director {
            Director::Up(x) => (current + len - (x % len)) % len,
            Director::Down(x) => (current + x) % len,
            Director::Top => 0,
            Director::Bottom => len - 1,
        };

        self.display_state.table_pos.select(Some(new_pos));
    }

    /// Keep the selection inside the list after it shrank or grew.
    pub(super) fn clamp_selection(&mut self) {
        let len = self.view.tracks.len();
        let pos = &mut self.display_state.table_pos;

        match (len, pos.selected()) {
            (0, _) => pos.select(None),
            (_, None) => pos.select(Some(0)),
            (len, Some(idx)) if idx >= len => pos.select(Some(len - 1)),
            _ => (),
        }
    }
}
