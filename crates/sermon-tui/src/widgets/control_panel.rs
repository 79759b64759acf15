//! Control panel widget
//!
//! Three rows: port selection and connection, manual send, and timed send
//! with the log toggles. Each control is styled by focus and enablement.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use sermon_app::{AppState, Control, ControlEnablement};

use crate::theme::{palette, styles};

const CURSOR: &str = "▏";

/// Width reserved for the send input's text
const SEND_INPUT_WIDTH: usize = 32;

pub struct ControlPanel<'a> {
    state: &'a AppState,
}

impl<'a> ControlPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn style_for(&self, control: Control, enablement: &ControlEnablement) -> Style {
        let focused = self.state.focus == control && !self.state.has_alert();
        styles::control(focused, enablement.is_enabled(control))
    }

    fn label(text: &'static str) -> Span<'static> {
        Span::styled(text, styles::text_secondary())
    }

    fn button(&self, text: &str, control: Control, en: &ControlEnablement) -> Span<'static> {
        Span::styled(format!("[ {} ]", text), self.style_for(control, en))
    }

    fn selector(&self, value: String, control: Control, en: &ControlEnablement) -> Span<'static> {
        Span::styled(format!("‹ {} ›", value), self.style_for(control, en))
    }

    fn input(
        &self,
        value: &str,
        width: usize,
        control: Control,
        en: &ControlEnablement,
    ) -> Span<'static> {
        let focused = self.state.focus == control;
        // Keep the tail visible while typing past the box.
        let chars: Vec<char> = value.chars().collect();
        let visible: String = if chars.len() > width {
            chars[chars.len() - width..].iter().collect()
        } else {
            value.to_string()
        };
        let cursor = if focused && en.is_enabled(control) {
            CURSOR
        } else {
            " "
        };
        let padding = width.saturating_sub(visible.chars().count());
        Span::styled(
            format!("[{}{}{}]", visible, cursor, " ".repeat(padding)),
            self.style_for(control, en),
        )
    }

    fn port_row(&self, en: &ControlEnablement) -> Line<'static> {
        let port = match self.state.ports.selected_port() {
            "" if self.state.ports.ports().is_empty() => "no ports".to_string(),
            "" => "-- Select Port --".to_string(),
            p => p.to_string(),
        };
        Line::from(vec![
            Self::label(" Port "),
            self.selector(port, Control::PortSelect, en),
            Self::label("  Baud "),
            self.selector(self.state.baud.selected().to_string(), Control::BaudSelect, en),
            Span::raw("  "),
            self.button("Refresh", Control::RefreshButton, en),
            Span::raw(" "),
            self.button(
                self.state.connect_button_label(),
                Control::ConnectButton,
                en,
            ),
        ])
    }

    fn send_row(&self, en: &ControlEnablement) -> Line<'static> {
        Line::from(vec![
            Self::label(" Send "),
            self.input(&self.state.send_input, SEND_INPUT_WIDTH, Control::SendInput, en),
            Span::raw(" "),
            self.button("Send", Control::SendButton, en),
        ])
    }

    fn timed_row(&self, en: &ControlEnablement) -> Line<'static> {
        let timed_on = self.state.timed_send.is_active();
        let timestamps_on = self.state.log.timestamps;
        let interval_width = self.state.interval_input.chars().count().max(6);

        let mut spans = vec![
            Self::label(" Every "),
            self.input(
                &self.state.interval_input,
                interval_width,
                Control::IntervalInput,
                en,
            ),
            Self::label(" ms "),
            self.button(
                if timed_on {
                    "Timed Send: ON"
                } else {
                    "Timed Send: OFF"
                },
                Control::TimedSendToggle,
                en,
            ),
            Span::raw(" "),
            self.button(
                if timestamps_on {
                    "Timestamps: ON"
                } else {
                    "Timestamps: OFF"
                },
                Control::TimestampToggle,
                en,
            ),
            Span::raw(" "),
            self.button("Clear", Control::ClearButton, en),
        ];
        if timed_on {
            spans.push(Span::styled(
                "  ⟳",
                Style::default().fg(palette::STATUS_YELLOW),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for ControlPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(true)
            .title(" Controls ")
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let en = self.state.enablement();
        let lines = vec![self.port_row(&en), self.send_row(&en), self.timed_row(&en)];
        Paragraph::new(lines).render(inner, buf);
    }
}
