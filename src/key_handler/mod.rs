mod action;

pub use action::handle_key_event;
pub use action::next_event;
use ratatui::crossterm::event::KeyEvent;
use ratatui::crossterm::event::KeyModifiers;

use crate::ui_state::PopupType;

const X: KeyModifiers = KeyModifiers::NONE;
const S: KeyModifiers = KeyModifiers::SHIFT;
const C: KeyModifiers = KeyModifiers::CONTROL;

/// Fraction of the track skipped by one seek key press.
const SEEK_STEP: f64 = 0.05;
const VOLUME_STEP: f32 = 0.05;
const SCROLL_MID: usize = 5;

#[derive(Debug, PartialEq)]
pub enum Action {
    // Player Controls
    Play,
    Stop,
    TogglePause,
    PlayNext,
    PlayPrev,
    Seek(f64),
    ToggleRepeat,

    // Volume popover
    OpenVolume,
    AdjustVolume(f32),
    PopoverOutside,

    // Library
    ImportTrack,
    ImportConfirm,
    DeleteTrack,

    // Display
    Scroll(Director),
    PopupInput(KeyEvent),
    ClosePopup,

    QUIT,
}

pub enum InputContext {
    TrackList,
    VolumePopover,
    Popup(PopupType),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Director {
    Up(usize),
    Down(usize),
    Top,
    Bottom,
}
