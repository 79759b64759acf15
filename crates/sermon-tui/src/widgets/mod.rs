//! Custom widgets for the sermon TUI

mod alert_dialog;
mod control_panel;
mod header;
mod log_view;
mod status_bar;

#[cfg(test)]
pub(crate) mod test_utils;

pub use alert_dialog::{centered_rect, AlertDialog};
pub use control_panel::ControlPanel;
pub use header::MainHeader;
pub use log_view::LogView;
pub use status_bar::StatusBar;
