//! Status bar widget
//!
//! Connection indicator on the left, then the current status text, with
//! key hints right-aligned.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use sermon_core::ConnectionState;

use crate::theme::{palette, styles};

const KEY_HINTS: &str = "Tab focus · Enter activate · ^L clear · ^Q quit ";

pub struct StatusBar<'a> {
    text: &'a str,
    connection: ConnectionState,
}

impl<'a> StatusBar<'a> {
    pub fn new(text: &'a str, connection: ConnectionState) -> Self {
        Self { text, connection }
    }

    fn indicator(&self) -> Span<'static> {
        let (icon, label, style) = styles::connection_indicator(self.connection);
        Span::styled(format!(" {} {} ", icon, label), style)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(palette::DEEPEST_BG));

        let line = Line::from(vec![
            self.indicator(),
            Span::styled("│ ", styles::text_muted()),
            Span::styled(self.text, styles::text_primary()),
        ]);
        Paragraph::new(line).render(area, buf);

        let hints_width = KEY_HINTS.chars().count() as u16;
        let used = Line::from(vec![
            self.indicator(),
            Span::raw("│ "),
            Span::raw(self.text),
        ])
        .width() as u16;
        if area.width >= used + hints_width + 1 {
            let hints_area = Rect::new(area.x + area.width - hints_width, area.y, hints_width, 1);
            Paragraph::new(Span::styled(KEY_HINTS, styles::text_muted())).render(hints_area, buf);
        }
    }
}
