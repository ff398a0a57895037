use super::DECORATOR;
use crate::{
    session::{SessionState, TransportIcon},
    ui_state::UiState,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Stylize,
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
};

pub struct BufferLine;

impl StatefulWidget for BufferLine {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let theme = &state.theme;
        let view = &state.view;

        let transport = view
            .controls
            .as_ref()
            .map(|c| c.transport)
            .unwrap_or(TransportIcon::Play);

        let status = match view.state {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Playing => "playing",
            SessionState::Paused => "paused",
            SessionState::Finished => "finished",
        };

        let left = Line::from_iter([
            Span::from(format!(" {} ", transport.glyph())).fg(theme.text_secondary),
            Span::from(status).fg(theme.text_faded),
            Span::from("  [n]ext [p]rev [s]top").fg(theme.text_faded),
        ]);

        let playing_title = match &view.controls {
            Some(c) => Line::from_iter([
                Span::from(c.title.clone()).fg(theme.text_secondary),
                Span::from(format!(" {DECORATOR} ")).fg(theme.text_faded),
                Span::from(c.artist.clone()).fg(theme.text_faded),
            ])
            .centered(),
            None => "".into(),
        };

        let repeat = match view.repeat {
            true => Span::from("⟳ repeat").fg(theme.text_highlighted),
            false => Span::from("⟳ repeat").fg(theme.text_faded).dim(),
        };

        let right = Line::from_iter([
            repeat,
            Span::from(format!(" {DECORATOR} ")).fg(theme.text_faded),
            Span::from(format!("vol {:>3.0}% ", view.volume * 100.0)).fg(theme.text_focused),
        ])
        .right_aligned();

        let [l, center, r] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .areas(area);

        left.render(l, buf);
        playing_title.render(center, buf);
        right.render(r, buf);
    }
}
