//! Main TUI runner - entry point and event loop

use sermon_app::config::Settings;
use sermon_app::Engine;
use sermon_core::prelude::*;

use super::{event, render, terminal};

/// Run the TUI against the bridge configured in `settings`.
pub async fn run(settings: Settings) -> Result<()> {
    terminal::install_panic_hook();

    // Before touching the terminal, so a bad URL is reported plainly
    let mut engine = Engine::new(settings)?;
    info!("Bridge at {}", engine.settings.server.url);

    let mut term = terminal::init()?;
    engine.start();

    let result = run_loop(&mut term, &mut engine);

    engine.shutdown().await;
    terminal::restore();

    result
}

fn run_loop(terminal: &mut ratatui::DefaultTerminal, engine: &mut Engine) -> Result<()> {
    while !engine.should_quit() {
        // Background tasks and the signal handler
        engine.drain_pending_messages();

        terminal.draw(|frame| render::view(frame, &mut engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }

    Ok(())
}
