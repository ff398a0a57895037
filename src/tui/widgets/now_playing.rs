use super::{DECORATOR, MUSIC_NOTE};
use crate::{
    session::{BoundControls, CoverView},
    ui_state::UiState,
};
use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Padding, Paragraph, StatefulWidget, Widget},
};

/// Share of the cover area used at neutral scale. Leaves room to pulse.
const COVER_FILL: f32 = 0.7;

pub struct NowPlaying;
impl StatefulWidget for NowPlaying {
    type State = UiState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let theme = &state.theme;

        let block = Block::bordered()
            .border_type(BorderType::Thick)
            .border_style(Style::new().fg(theme.border_faded))
            .title_top(Line::from(" Now Playing ".fg(theme.text_secondary).italic()))
            .title_alignment(Alignment::Center)
            .padding(Padding::uniform(1))
            .bg(theme.bg_panel);

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(controls) = &state.view.controls else {
            Paragraph::new("Nothing playing. Select a track and press <Enter>.")
                .fg(theme.text_faded)
                .centered()
                .render(inner, buf);
            return;
        };

        let [cover_area, info_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(4)]).areas(inner);

        match &controls.cover {
            CoverView::Image(image) => draw_cover(image, controls.cover_scale, cover_area, buf),
            CoverView::Placeholder => draw_placeholder(controls.cover_scale, cover_area, buf),
        }

        track_info(controls, state).render(info_area, buf);
    }
}

fn track_info<'a>(controls: &'a BoundControls, state: &UiState) -> Paragraph<'a> {
    let theme = &state.theme;

    Paragraph::new(vec![
        Line::from(controls.title.as_str().fg(theme.text_focused).bold()),
        Line::from_iter([
            controls.artist.as_str().fg(theme.text_secondary),
            format!(" {DECORATOR} ").fg(theme.text_faded),
            controls.album.as_str().fg(theme.text_faded).italic(),
        ]),
        Line::default(),
        Line::from(
            format!("{} / {}", controls.elapsed, controls.total).fg(theme.text_highlighted),
        ),
    ])
    .centered()
}

/// Side of the drawn square in pixels, where a cell is one pixel wide and
/// two pixels tall.
fn cover_side(area: Rect, scale: f32) -> u16 {
    let max_side = area.width.min(area.height.saturating_mul(2));
    let side = (max_side as f32 * COVER_FILL * scale).round();
    side.clamp(1.0, max_side as f32) as u16
}

/// Paint `image` with upper-half blocks, nearest-neighbour sampled into a
/// square centred in `area`.
fn draw_cover(image: &RgbaImage, scale: f32, area: Rect, buf: &mut Buffer) {
    if area.is_empty() || image.width() == 0 || image.height() == 0 {
        return;
    }

    let side = cover_side(area, scale);
    let left = area.x + (area.width - side) / 2;
    let top_px = (area.height * 2 - side) / 2;

    let pixel = |px_x: u16, px_y: u16| -> Option<Color> {
        if px_x < left || px_x >= left + side || px_y < top_px || px_y >= top_px + side {
            return None;
        }
        let ix = (px_x - left) as u32 * image.width() / side as u32;
        let iy = (px_y - top_px) as u32 * image.height() / side as u32;
        let [r, g, b, _] = image.get_pixel(ix, iy).0;
        Some(Color::Rgb(r, g, b))
    };

    for row in 0..area.height {
        for x in area.x..area.x + area.width {
            let upper = pixel(x, row * 2);
            let lower = pixel(x, row * 2 + 1);
            if upper.is_none() && lower.is_none() {
                continue;
            }

            if let Some(cell) = buf.cell_mut((x, area.y + row)) {
                cell.set_symbol("▀")
                    .set_fg(upper.unwrap_or(Color::Reset))
                    .set_bg(lower.unwrap_or(Color::Reset));
            }
        }
    }
}

fn draw_placeholder(scale: f32, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }

    let side = cover_side(area, scale);
    let width = side.max(3).min(area.width);
    let height = (side / 2).max(3).min(area.height);

    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    Paragraph::new(MUSIC_NOTE)
        .centered()
        .block(Block::bordered().border_type(BorderType::Rounded))
        .fg(Color::DarkGray)
        .render(rect, buf);
}
