//! Session log widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

use sermon_app::{LogLine, LogRenderer};

use crate::theme::{palette, styles};

/// Shows the lines of the log that fall inside its viewport.
///
/// The viewport height must already be recorded on the renderer via
/// `set_viewport_height`, so the offset matches what is drawn.
pub struct LogView<'a> {
    log: &'a LogRenderer,
}

impl<'a> LogView<'a> {
    pub fn new(log: &'a LogRenderer) -> Self {
        Self { log }
    }

    /// Height available for log lines inside the border.
    pub fn inner_height(area: Rect) -> usize {
        area.height.saturating_sub(2) as usize
    }

    fn format_line(line: &LogLine) -> Line<'static> {
        let body_style = styles::log_direction(line.direction());
        match line.rendered.strip_suffix(line.entry.text.as_str()) {
            Some(prefix) if !prefix.is_empty() => Line::from(vec![
                Span::styled(prefix.to_string(), styles::log_timestamp()),
                Span::styled(line.entry.text.clone(), body_style),
            ]),
            _ => Line::from(Span::styled(line.rendered.clone(), body_style)),
        }
    }

    fn render_empty(area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let y = area.y + area.height / 2;
        let row = Rect::new(area.x, y, area.width, 1);
        Paragraph::new("Open a port to start monitoring")
            .style(styles::text_muted())
            .alignment(Alignment::Center)
            .render(row, buf);
    }
}

impl Widget for LogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false)
            .title(" Log ")
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.log.is_empty() {
            Self::render_empty(inner, buf);
            return;
        }

        let (start, end) = self.log.view.visible_range();
        let lines: Vec<Line> = self
            .log
            .lines()
            .range(start..end)
            .map(Self::format_line)
            .collect();
        Paragraph::new(lines).render(inner, buf);

        let view = &self.log.view;
        if view.total_lines > view.visible_lines && view.visible_lines > 0 {
            let mut scroll_state = ScrollbarState::new(view.max_offset()).position(view.offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .thumb_style(Style::default().fg(palette::BORDER_ACTIVE))
                .track_style(Style::default().fg(palette::BORDER_DIM))
                .render(
                    area.inner(Margin {
                        vertical: 1,
                        horizontal: 0,
                    }),
                    buf,
                    &mut scroll_state,
                );
        }
    }
}
