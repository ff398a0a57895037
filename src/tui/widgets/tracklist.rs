use super::{DECORATOR, MUSIC_NOTE};
use crate::{truncate_at_last_space, ui_state::{Pane, UiState}};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout},
    style::{Style, Stylize},
    text::Line,
    widgets::{
        Block, BorderType, Cell, Padding, Paragraph, Row, StatefulWidget, Table, Widget, Wrap,
    },
};

const COLUMN_SPACING: u16 = 2;

const PADDING: Padding = Padding {
    left: 2,
    right: 2,
    top: 1,
    bottom: 1,
};

const KEYMAPS: &str = " [a]dd ✧ [x] remove ✧ [v]olume ✧ [r]epeat ";
const EMPTY_HINT: &str = "Library is empty.\nPress [a] to add a track.";

pub struct TrackTable;
impl StatefulWidget for TrackTable {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let theme = &state.theme;
        let focused = state.display_state.pane == Pane::TrackList;
        let title_width = (area.width / 3) as usize;

        let rows = state
            .view
            .tracks
            .iter()
            .map(|track| {
                let is_playing = state.view.active_key.as_deref() == Some(track.key.as_str());
                let icon = match is_playing {
                    true => Cell::from(MUSIC_NOTE).fg(theme.text_secondary),
                    false => Cell::from(""),
                };
                let title = truncate_at_last_space(&track.metadata.title, title_width);

                Row::new([
                    icon,
                    Cell::from(title).fg(theme.text_focused),
                    Cell::from(track.metadata.artist.clone()).fg(theme.text_faded),
                    Cell::from(track.metadata.album.clone()).fg(theme.text_faded),
                ])
            })
            .collect::<Vec<Row>>();

        let title = Line::from_iter([
            " Library ".fg(theme.text_secondary).italic(),
            format!("[{} Tracks] ", state.view.tracks.len()).fg(theme.text_faded),
        ]);

        let border = match focused {
            true => theme.border,
            false => theme.border_faded,
        };

        let block = Block::bordered()
            .border_type(BorderType::Thick)
            .border_style(Style::new().fg(border))
            .title_top(title.alignment(Alignment::Center))
            .title_bottom(Line::from(KEYMAPS.fg(theme.text_faded)).centered())
            .padding(PADDING)
            .bg(theme.bg_panel);

        if state.view.tracks.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);

            let [hint] = Layout::vertical([Constraint::Length(2)])
                .flex(Flex::Center)
                .areas(inner);
            Paragraph::new(EMPTY_HINT)
                .fg(theme.text_faded)
                .wrap(Wrap { trim: true })
                .centered()
                .render(hint, buf);
            return;
        }

        let widths = [
            Constraint::Length(1),
            Constraint::Ratio(4, 9),
            Constraint::Ratio(2, 9),
            Constraint::Ratio(2, 9),
        ];

        let table = Table::new(rows, widths)
            .header(
                Row::new(["", "Title", "Artist", "Album"])
                    .fg(theme.text_highlighted)
                    .bold(),
            )
            .block(block)
            .column_spacing(COLUMN_SPACING)
            .flex(Flex::Start)
            .row_highlight_style(Style::new().fg(theme.bg_panel).bg(theme.border))
            .highlight_symbol(format!("{DECORATOR} "));

        StatefulWidget::render(table, area, buf, &mut state.display_state.table_pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{buffer::Buffer, layout::Rect};

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_library_shows_hint() {
        let mut state = UiState::new();
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);

        TrackTable.render(area, &mut buf, &mut state);

        let screen = text(&buf);
        assert!(screen.contains("Library is empty."));
        assert!(screen.contains("Press [a] to add a track."));
        assert!(screen.contains("[0 Tracks]"));
        assert!(!screen.contains("Title"));
    }
}
