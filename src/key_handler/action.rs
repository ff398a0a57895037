use crate::{
    REFRESH_RATE,
    app_core::Resonance,
    key_handler::*,
    ui_state::{PopupType, UiState},
};
use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::time::Duration;

use KeyCode::*;

pub fn handle_key_event(key_event: KeyEvent, state: &UiState) -> Option<Action> {
    if let Some(action) = global_commands(&key_event) {
        return Some(action);
    }

    match state.get_input_context() {
        InputContext::Popup(popup) => handle_popup(&key_event, &popup),
        InputContext::VolumePopover => handle_volume_popover(&key_event),
        InputContext::TrackList => handle_tracklist(&key_event),
    }
}

fn global_commands(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (C, Char('c')) => Some(Action::QUIT),
        _ => None,
    }
}

fn handle_tracklist(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        // PLAYBACK COMMANDS
        (X, Enter) => Some(Action::Play),
        (X, Char(' ')) => Some(Action::TogglePause),
        (X, Char('s')) => Some(Action::Stop),
        (X, Char('n')) => Some(Action::PlayNext),
        (X, Char('p')) => Some(Action::PlayPrev),
        (X, Char('r')) => Some(Action::ToggleRepeat),

        (X, Right) => Some(Action::Seek(SEEK_STEP)),
        (X, Left) => Some(Action::Seek(-SEEK_STEP)),

        (X, Char('v')) => Some(Action::OpenVolume),
        (_, Char('+')) | (X, Char('=')) => Some(Action::AdjustVolume(VOLUME_STEP)),
        (X, Char('-')) => Some(Action::AdjustVolume(-VOLUME_STEP)),

        // LIBRARY
        (X, Char('a')) => Some(Action::ImportTrack),
        (X, Char('x')) => Some(Action::DeleteTrack),

        // SCROLLING
        (X, Char('j')) | (X, Down) => Some(Action::Scroll(Director::Down(1))),
        (X, Char('k')) | (X, Up) => Some(Action::Scroll(Director::Up(1))),
        (X, Char('d')) => Some(Action::Scroll(Director::Down(SCROLL_MID))),
        (X, Char('u')) => Some(Action::Scroll(Director::Up(SCROLL_MID))),
        (X, Char('g')) => Some(Action::Scroll(Director::Top)),
        (S, Char('G')) => Some(Action::Scroll(Director::Bottom)),

        (X, Char('q')) => Some(Action::QUIT),
        _ => None,
    }
}

/// `+`/`-` adjust the volume; any other key counts as an interaction
/// outside the popover.
fn handle_volume_popover(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (_, Char('+')) | (X, Char('=')) | (X, Up) | (X, Right) => {
            Some(Action::AdjustVolume(VOLUME_STEP))
        }
        (X, Char('-')) | (X, Down) | (X, Left) => Some(Action::AdjustVolume(-VOLUME_STEP)),
        _ => Some(Action::PopoverOutside),
    }
}

fn handle_popup(key: &KeyEvent, popup: &PopupType) -> Option<Action> {
    match popup {
        PopupType::Import => match key.code {
            Esc => Some(Action::ClosePopup),
            Enter => Some(Action::ImportConfirm),
            _ => Some(Action::PopupInput(*key)),
        },
        PopupType::Error(_) => match key.code {
            Esc | Enter | Char('?') | Char('q') => Some(Action::ClosePopup),
            _ => None,
        },
        PopupType::None => None,
    }
}

pub fn next_event() -> Result<Option<Event>> {
    match event::poll(Duration::from_millis(REFRESH_RATE))? {
        true => Ok(Some(event::read()?)),
        false => Ok(None),
    }
}

impl Resonance {
    #[rustfmt::skip]
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            // Player
            Action::Play            => self.play_selected()?,
            Action::TogglePause     => self.session.toggle_play_pause(),
            Action::Stop            => self.session.stop(),
            Action::PlayNext        => self.session.next()?,
            Action::PlayPrev        => self.session.previous()?,
            Action::Seek(delta)     => self.session.seek_by(delta),
            Action::ToggleRepeat    => self.session.toggle_repeat(),

            // Volume
            Action::OpenVolume      => self.session.open_volume_popover(),
            Action::AdjustVolume(d) => self.adjust_volume(d),
            Action::PopoverOutside  => self.popover_outside(),

            // Library
            Action::ImportTrack     => self.ui.show_popup(PopupType::Import),
            Action::ImportConfirm   => self.import_from_popup()?,
            Action::DeleteTrack     => self.delete_selected()?,

            // UI
            Action::Scroll(s)       => self.ui.scroll(s),
            Action::PopupInput(key) => { self.ui.popup.input.input(key); }
            Action::ClosePopup      => self.ui.close_popup(),

            Action::QUIT            => self.ui.set_mode(crate::ui_state::Mode::QUIT),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn tracklist_bindings() {
        let ui = UiState::new();

        assert_eq!(handle_key_event(press(Enter), &ui), Some(Action::Play));
        assert_eq!(handle_key_event(press(Char('n')), &ui), Some(Action::PlayNext));
        assert_eq!(handle_key_event(press(Right), &ui), Some(Action::Seek(SEEK_STEP)));
        assert_eq!(handle_key_event(press(Char('z')), &ui), None);
    }

    #[test]
    fn ctrl_c_quits_from_popup() {
        let mut ui = UiState::new();
        ui.show_popup(PopupType::Import);

        let key = KeyEvent::new(Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(key, &ui), Some(Action::QUIT));
    }

    #[test]
    fn import_popup_takes_text() {
        let mut ui = UiState::new();
        ui.show_popup(PopupType::Import);

        assert_eq!(
            handle_key_event(press(Char('q')), &ui),
            Some(Action::PopupInput(press(Char('q'))))
        );
        assert_eq!(handle_key_event(press(Enter), &ui), Some(Action::ImportConfirm));
        assert_eq!(handle_key_event(press(Esc), &ui), Some(Action::ClosePopup));
    }

    #[test]
    fn popover_keys() {
        assert_eq!(
            handle_volume_popover(&press(Char('+'))),
            Some(Action::AdjustVolume(VOLUME_STEP))
        );
        assert_eq!(handle_volume_popover(&press(Char('j'))), Some(Action::PopoverOutside));
    }
}
