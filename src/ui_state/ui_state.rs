use super::{DisplayState, SessionView, theme::Theme};
use crate::{
    key_handler::InputContext,
    ui_state::popup::{PopupState, PopupType},
};
use anyhow::Error;
use log::error;

pub struct UiState {
    // Visual Elements
    pub(crate) theme: Theme,
    pub(crate) popup: PopupState,
    pub(crate) display_state: DisplayState,

    // View models
    pub(crate) view: SessionView,
}

impl UiState {
    pub fn new() -> Self {
        UiState {
            theme: Theme::set_generic_theme(),
            popup: PopupState::new(),
            display_state: DisplayState::new(),
            view: SessionView::default(),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn set_error(&mut self, e: Error) {
        error!("{e:#}");
        self.show_popup(PopupType::Error(e.to_string()));
    }

    pub fn get_error(&self) -> Option<&str> {
        match &self.popup.current {
            PopupType::Error(e) => Some(e.as_str()),
            _ => None,
        }
    }

    pub fn selected_key(&self) -> Option<&str> {
        let idx = self.selected_index()?;
        self.view.tracks.get(idx).map(|t| t.key.as_str())
    }

    pub fn volume_popover_open(&self) -> bool {
        self.view
            .controls
            .as_ref()
            .is_some_and(|c| c.volume_popover)
    }

    pub fn get_input_context(&self) -> InputContext {
        if self.popup.is_open() {
            return InputContext::Popup(self.popup.current.clone());
        }

        match self.volume_popover_open() {
            true => InputContext::VolumePopover,
            false => InputContext::TrackList,
        }
    }
}
