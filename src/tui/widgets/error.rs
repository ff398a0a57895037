use super::POPUP_PADDING;
use crate::ui_state::{GOOD_RED, UiState};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Paragraph, StatefulWidget, Widget, Wrap},
};

const LOG_HINT: &str = "Details are in resonance.log next to config.toml";

pub struct ErrorMsg;
impl StatefulWidget for ErrorMsg {
    type State = UiState;
    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let theme = &state.theme;
        let message = state.get_error().unwrap_or("Something went wrong");

        let block = Block::bordered()
            .border_type(BorderType::Double)
            .border_style(Style::new().fg(GOOD_RED))
            .title(Line::from(" Error ".fg(GOOD_RED).bold()).centered())
            .title_bottom(Line::from(" [Esc] dismiss ".fg(theme.text_faded)).centered())
            .padding(POPUP_PADDING)
            .bg(theme.bg_panel);

        let inner = block.inner(area);
        block.render(area, buf);

        let [body, hint] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .centered()
            .fg(theme.text_focused)
            .render(body, buf);

        Paragraph::new(LOG_HINT)
            .centered()
            .fg(theme.text_faded)
            .italic()
            .render(hint, buf);
    }
}
