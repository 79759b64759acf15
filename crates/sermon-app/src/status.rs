//! Status line with transient messages

use std::time::{Duration, Instant};

/// How long a transient status stays before reverting
pub const TRANSIENT_STATUS_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRevert {
    /// Revision the transient text was shown at
    revision: u64,
    revert_to: String,
    at: Instant,
}

/// The one-line status shown under the controls.
///
/// Every change bumps `revision`. A transient text only reverts if the
/// revision is still the one it was shown at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    revision: u64,
    pending: Option<PendingRevert>,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new("Disconnected")
    }
}

impl StatusLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            revision: 0,
            pending: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.revision += 1;
        self.pending = None;
    }

    /// Show `text` until `now + TRANSIENT_STATUS_DURATION`, then go back to
    /// `revert_to` unless something else was shown in between.
    pub fn set_transient(&mut self, text: impl Into<String>, revert_to: String, now: Instant) {
        self.set(text);
        self.pending = Some(PendingRevert {
            revision: self.revision,
            revert_to,
            at: now + TRANSIENT_STATUS_DURATION,
        });
    }

    pub fn expire(&mut self, now: Instant) {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.at);
        if !due {
            return;
        }
        if let Some(pending) = self.pending.take() {
            if pending.revision == self.revision {
                self.text = pending.revert_to;
                self.revision += 1;
            }
        }
    }
}
