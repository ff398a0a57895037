#[derive(Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    QUIT,
}

/// Where key presses go.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    TrackList,
    Popup,
}

impl PartialEq<Mode> for &Mode {
    fn eq(&self, other: &Mode) -> bool {
        std::mem::discriminant(*self) == std::mem::discriminant(other)
    }
}
