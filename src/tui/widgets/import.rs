use super::POPUP_PADDING;
use crate::ui_state::UiState;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Style, Stylize},
    widgets::{Block, BorderType, Padding, Paragraph, StatefulWidget, Widget, Wrap},
};

pub struct ImportPopup;
impl StatefulWidget for ImportPopup {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let theme = &state.theme;

        let block = Block::bordered()
            .title(" Import Track ")
            .title_bottom(" [Enter] import / [Esc] cancel ")
            .title_alignment(ratatui::layout::Alignment::Center)
            .border_type(BorderType::Double)
            .border_style(Style::new().fg(theme.border))
            .bg(theme.bg_panel)
            .padding(POPUP_PADDING);

        let inner = block.inner(area);
        block.render(area, buf);

        let [prompt, input, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(inner);

        Paragraph::new("Path to an audio file (mp3, m4a, ogg, wav, flac):")
            .fg(theme.text_faded)
            .wrap(Wrap { trim: false })
            .render(prompt, buf);

        let (text_highlighted, text_focused) = (theme.text_highlighted, theme.text_focused);

        state.popup.input.set_block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .fg(text_highlighted)
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                }),
        );
        state
            .popup
            .input
            .set_style(Style::new().fg(text_focused));

        state.popup.input.render(input, buf);
    }
}
