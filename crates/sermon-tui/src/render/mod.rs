//! Main render/view function (View in TEA pattern)

#[cfg(test)]
mod tests;

use std::time::Instant;

use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use sermon_app::AppState;

use super::{layout, widgets};
use crate::theme::palette;

/// Render the complete UI (View function in TEA)
///
/// Only the log viewport height is written back to state, so scrolling
/// and follow-bottom work against what was actually drawn.
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area);
    let now = Instant::now();

    let header = widgets::MainHeader::new(&state.settings.server.url).activity(
        state.indicators.rx.is_active(now),
        state.indicators.tx.is_active(now),
    );
    frame.render_widget(header, areas.header);

    frame.render_widget(widgets::ControlPanel::new(state), areas.controls);

    state
        .log
        .set_viewport_height(widgets::LogView::inner_height(areas.logs));
    frame.render_widget(widgets::LogView::new(&state.log), areas.logs);

    frame.render_widget(
        widgets::StatusBar::new(state.status.text(), state.connection_state()),
        areas.status,
    );

    if let Some(message) = &state.alert {
        frame.render_widget(widgets::AlertDialog::new(message), area);
    }
}
