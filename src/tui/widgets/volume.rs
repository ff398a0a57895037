use crate::ui_state::UiState;
use ratatui::{
    style::{Style, Stylize},
    widgets::{Block, BorderType, Gauge, StatefulWidget, Widget},
};

pub struct VolumePopover;
impl StatefulWidget for VolumePopover {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let theme = &state.theme;
        let volume = state.view.volume.clamp(0.0, 1.0);

        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::new().fg(theme.border))
                    .title(" Volume [+/-] "),
            )
            .gauge_style(Style::new().fg(state.view.engine.progress_color))
            .label(format!("{:.0}%", volume * 100.0))
            .ratio(volume as f64)
            .bg(theme.bg_panel)
            .render(area, buf);
    }
}
