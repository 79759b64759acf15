//! Abstract input key event, independent of terminal library.
//!
//! Keeps sermon-app free of crossterm types; the TUI converts
//! `crossterm::event::KeyEvent` into [`InputKey`] at its boundary.

/// Abstract input key event, independent of terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    // Character keys
    /// Regular character key (a-z, 0-9, symbols, space)
    Char(char),
    /// Character with Ctrl modifier (Ctrl+c, Ctrl+l, etc.)
    CharCtrl(char),

    // Navigation
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    // Navigation with Ctrl (log scrolling)
    CtrlUp,
    CtrlDown,
    CtrlHome,
    CtrlEnd,

    // Action keys
    Enter,
    Esc,
    Tab,
    /// Shift+Tab (BackTab)
    BackTab,
    Backspace,
    Delete,
}

impl InputKey {
    /// Keys that activate a focused button or toggle
    pub fn is_activate(&self) -> bool {
        matches!(self, InputKey::Enter | InputKey::Char(' '))
    }
}
