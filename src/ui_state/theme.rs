use ratatui::style::Color;

pub const DARK_WHITE: Color = Color::Rgb(210, 210, 210);
pub const MID_GRAY: Color = Color::Rgb(100, 100, 100);
pub const DARK_GRAY: Color = Color::Rgb(25, 25, 25);
pub const DARK_GRAY_FADED: Color = Color::Rgb(10, 10, 10);
pub const GOOD_RED: Color = Color::Rgb(255, 70, 70);
pub const GOLD: Color = Color::Rgb(220, 220, 100);
pub const GOLD_FADED: Color = Color::Rgb(130, 130, 60);

pub(crate) struct Theme {
    pub bg_panel: Color,
    pub bg_global: Color,
    pub border: Color,
    pub border_faded: Color,
    pub text_focused: Color,
    pub text_secondary: Color,
    pub text_faded: Color,
    pub text_highlighted: Color,
}

impl Theme {
    pub fn set_generic_theme() -> Theme {
        Theme {
            bg_panel: DARK_GRAY,
            bg_global: DARK_GRAY_FADED,
            border: GOLD,
            border_faded: Color::Rgb(50, 50, 50),
            text_focused: DARK_WHITE,
            text_secondary: GOOD_RED,
            text_faded: MID_GRAY,
            text_highlighted: GOLD_FADED,
        }
    }
}
