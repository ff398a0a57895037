use super::{DUR_WIDTH, WAVEFORM_WIDGET_HEIGHT};
use crate::{player::BarStyle, ui_state::UiState};
use canvas::Context;
use ratatui::{
    layout::Rect,
    style::{Color, Stylize},
    text::Text,
    widgets::{
        StatefulWidget,
        canvas::{Canvas, Rectangle},
        *,
    },
};

pub struct Waveform;
impl StatefulWidget for Waveform {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let bins = &state.view.waveform.bins;
        if area.height == 0 || bins.is_empty() {
            return;
        }
        let wf_len = bins.len();
        let config = &state.view.engine;

        let progress = state
            .view
            .playhead
            .filter(|p| !p.duration.is_zero())
            .map(|p| p.current.as_secs_f64() / p.duration.as_secs_f64())
            .unwrap_or(0.0);

        if let Some(controls) = &state.view.controls {
            let y = area.y + area.height / 2;
            let x_duration = (area.x + area.width).saturating_sub(DUR_WIDTH + 2);

            Text::from(controls.elapsed.as_str())
                .fg(Color::DarkGray)
                .right_aligned()
                .render(Rect::new(area.x + 2, y, DUR_WIDTH, 1), buf);

            Text::from(controls.total.as_str())
                .fg(Color::DarkGray)
                .right_aligned()
                .render(Rect::new(x_duration, y, DUR_WIDTH, 1), buf);
        }

        Canvas::default()
            .x_bounds([0.0, wf_len as f64])
            .y_bounds([WAVEFORM_WIDGET_HEIGHT * -1.0, WAVEFORM_WIDGET_HEIGHT])
            .paint(|ctx| {
                let played = progress * wf_len as f64;

                for (idx, amp) in bins.iter().enumerate() {
                    let hgt = (*amp as f64 * WAVEFORM_WIDGET_HEIGHT).round();
                    let color = match (idx as f64) < played {
                        true => config.progress_color,
                        false => config.wave_color,
                    };

                    match config.bar_style {
                        BarStyle::Line => draw_waveform_line(ctx, idx as f64, hgt, color),
                        BarStyle::Bars => draw_waveform_rect(ctx, idx as f64, hgt, color),
                    }
                }

                if config.cursor_visible {
                    draw_waveform_line(ctx, played, WAVEFORM_WIDGET_HEIGHT, Color::White);
                }
            })
            .block(Block::new().padding(Padding {
                left: 10,
                right: 10,
                top: 1,
                bottom: 1,
            }))
            .render(area, buf)
    }
}

/// Lines create a more detailed and cleaner look
/// especially when seen in smaller windows
fn draw_waveform_line(ctx: &mut Context, idx: f64, hgt: f64, color: Color) {
    ctx.draw(&canvas::Line {
        x1: idx,
        x2: idx,
        y1: hgt,
        y2: hgt * -1.0,
        color,
    })
}

fn draw_waveform_rect(ctx: &mut Context, idx: f64, hgt: f64, color: Color) {
    ctx.draw(&Rectangle {
        x: idx,
        y: hgt * -1.0,
        width: 0.5, // This value makes the waveform cleaner on resize
        height: hgt * 2.0,
        color,
    });
}
