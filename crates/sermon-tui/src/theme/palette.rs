//! Color palette.

use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Black; // Terminal background
pub const CARD_BG: Color = Color::Black; // Panel backgrounds
pub const POPUP_BG: Color = Color::DarkGray; // Modal backgrounds

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Cyan;

// --- Accent ---
pub const ACCENT: Color = Color::Cyan;
pub const CONTRAST_FG: Color = Color::Black; // Text on accent background

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;

// --- Status ---
pub const STATUS_GREEN: Color = Color::Green;
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;

// --- Log directions ---
pub const LOG_TRANSMIT: Color = Color::Cyan;
pub const LOG_RECEIVE: Color = Color::White;
pub const LOG_INFO: Color = Color::DarkGray;
pub const LOG_TIMESTAMP: Color = Color::Gray;

// --- Activity LEDs ---
pub const LED_RX: Color = Color::Green;
pub const LED_TX: Color = Color::Yellow;
pub const LED_OFF: Color = Color::DarkGray;
