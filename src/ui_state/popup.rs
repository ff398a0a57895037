use tui_textarea::TextArea;

use crate::ui_state::{Pane, UiState, new_textarea};

#[derive(Clone, PartialEq)]
pub enum PopupType {
    None,
    Error(String),
    Import,
}

pub struct PopupState {
    pub current: PopupType,
    pub input: TextArea<'static>,
    pub cached: Pane,
}

impl PopupState {
    pub(crate) fn new() -> PopupState {
        PopupState {
            current: PopupType::None,
            input: new_textarea(""),
            cached: Pane::Popup,
        }
    }

    fn open(&mut self, popup: PopupType) {
        if popup == PopupType::Import {
            self.input.set_placeholder_text(" Enter path to an audio file: ");
            self.input.select_all();
            self.input.cut();
        }
        self.current = popup
    }

    pub fn is_open(&self) -> bool {
        self.current != PopupType::None
    }

    fn close(&mut self) -> Pane {
        self.current = PopupType::None;
        self.input.select_all();
        self.input.cut();

        self.cached.clone()
    }

    /// Text typed into the popup's input line.
    pub fn input_text(&self) -> String {
        self.input.lines().join("").trim().to_string()
    }
}

impl UiState {
    pub fn show_popup(&mut self, popup: PopupType) {
        self.popup.open(popup);
        if self.popup.cached == Pane::Popup {
            self.popup.cached = self.get_pane().clone();
            self.set_pane(Pane::Popup);
        }
    }

    pub fn close_popup(&mut self) {
        let pane = self.popup.close();
        self.popup.cached = Pane::Popup;
        self.set_pane(pane);
    }
}
