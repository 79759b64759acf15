//! Terminal setup and restoration

use sermon_core::prelude::*;

/// Enter raw mode and the alternate screen.
pub fn init() -> Result<ratatui::DefaultTerminal> {
    ratatui::try_init().map_err(|e| Error::terminal(format!("cannot start terminal: {e}")))
}

/// Leave the alternate screen; failures are logged.
pub fn restore() {
    if let Err(e) = ratatui::try_restore() {
        tracing::warn!("Terminal restore failed: {}", e);
    }
}

/// Install a panic hook that logs the panic and restores the terminal
/// before the default report.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!("Panic: {}", panic_info);
        restore();
        original_hook(panic_info);
    }));
}
