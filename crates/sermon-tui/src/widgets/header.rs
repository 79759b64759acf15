//! Header bar widget
//!
//! Shows the app title, the bridge URL and the RX/TX activity LEDs.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::{palette, styles};

const LED_ON: &str = "●";
const LED_OFF: &str = "○";

/// Main header with activity indicators
pub struct MainHeader<'a> {
    server_url: &'a str,
    rx_active: bool,
    tx_active: bool,
}

impl<'a> MainHeader<'a> {
    pub fn new(server_url: &'a str) -> Self {
        Self {
            server_url,
            rx_active: false,
            tx_active: false,
        }
    }

    pub fn activity(mut self, rx_active: bool, tx_active: bool) -> Self {
        self.rx_active = rx_active;
        self.tx_active = tx_active;
        self
    }

    fn led(label: &'static str, active: bool, on_color: ratatui::style::Color) -> Vec<Span<'static>> {
        let (glyph, style) = if active {
            (
                LED_ON,
                Style::default().fg(on_color).add_modifier(Modifier::BOLD),
            )
        } else {
            (LED_OFF, Style::default().fg(palette::LED_OFF))
        };
        vec![
            Span::styled(label, styles::text_secondary()),
            Span::raw(" "),
            Span::styled(glyph, style),
        ]
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut leds = Self::led("RX", self.rx_active, palette::LED_RX);
        leds.push(Span::raw("  "));
        leds.extend(Self::led("TX", self.tx_active, palette::LED_TX));
        leds.push(Span::raw(" "));
        let leds_width: u16 = leds.iter().map(|s| s.width() as u16).sum();

        let title = Line::from(vec![
            Span::raw(" "),
            Span::styled("sermon", styles::accent_bold()),
            Span::styled("  ", styles::text_muted()),
            Span::styled(self.server_url, styles::text_muted()),
        ]);

        let row = Rect::new(inner.x, inner.y, inner.width, 1);
        Paragraph::new(title).render(row, buf);

        if inner.width > leds_width {
            let leds_area = Rect::new(
                inner.x + inner.width - leds_width,
                inner.y,
                leds_width,
                1,
            );
            Paragraph::new(Line::from(leds)).render(leds_area, buf);
        }
    }
}
