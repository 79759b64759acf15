//! Modal alert for rejected user actions

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use crate::theme::styles;

const MIN_WIDTH: u16 = 30;
const MAX_WIDTH: u16 = 60;

/// Centered box showing `message`, dismissed with any key.
pub struct AlertDialog<'a> {
    message: &'a str,
}

impl<'a> AlertDialog<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

/// Center a rect of the given size within `area`, clamped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

impl Widget for AlertDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text_width = self.message.chars().count() as u16 + 4;
        let width = text_width.clamp(MIN_WIDTH, MAX_WIDTH);
        let text_rows = (self.message.chars().count() as u16).div_ceil(width.saturating_sub(4).max(1));
        // borders + text + blank + hint
        let height = text_rows + 4;

        let popup = centered_rect(width, height, area);
        Clear.render(popup, buf);

        let block = styles::modal_block(" Alert ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::styled(self.message, styles::text_primary()),
            Line::raw(""),
            Line::styled("press any key", styles::text_muted()),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
