//! Termination signals become `Message::Quit`, so the open session is
//! closed the same way as a user quit.

use std::fmt;

use tokio::sync::mpsc;

use sermon_core::prelude::*;

use crate::message::Message;

/// Which OS signal asked sermon to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    /// Controlling terminal went away
    Hangup,
    #[cfg(not(unix))]
    CtrlC,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
            ShutdownSignal::Hangup => "SIGHUP",
            #[cfg(not(unix))]
            ShutdownSignal::CtrlC => "Ctrl+C",
        })
    }
}

/// Spawn the listener. Posts a single `Quit` on the first signal.
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        // Listener errors are logged by `context`; Ctrl+C in the TUI still quits.
        if let Ok(signal) = wait_for_signal().await {
            info!("{} received, closing session and quitting", signal);
            let _ = tx.send(Message::Quit).await;
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<ShutdownSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).context("Installing SIGINT listener")?;
    let mut sigterm = signal(SignalKind::terminate()).context("Installing SIGTERM listener")?;
    let mut sighup = signal(SignalKind::hangup()).context("Installing SIGHUP listener")?;

    let received = tokio::select! {
        _ = sigint.recv() => ShutdownSignal::Interrupt,
        _ = sigterm.recv() => ShutdownSignal::Terminate,
        _ = sighup.recv() => ShutdownSignal::Hangup,
    };
    Ok(received)
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<ShutdownSignal> {
    tokio::signal::ctrl_c()
        .await
        .context("Listening for Ctrl+C")?;
    Ok(ShutdownSignal::CtrlC)
}
