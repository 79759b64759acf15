//! Port and baud-rate selectors

use tracing::debug;

// ─────────────────────────────────────────────────────────────────────────────
// PortSelector
// ─────────────────────────────────────────────────────────────────────────────

/// Who asked for a port-list fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    /// The fetch made once at startup; success is silent
    Startup,
    /// The refresh control
    User,
}

/// Refresh that is waiting for its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRefresh {
    /// Status text shown before "Refreshing port list..."
    pub status_before: String,
    /// Status revision right after "Refreshing port list..." was shown
    pub status_revision: u64,
}

/// Available serial ports and the current choice
#[derive(Debug, Clone, Default)]
pub struct PortSelector {
    ports: Vec<String>,
    selected: Option<usize>,
    pub pending_refresh: Option<PendingRefresh>,
}

impl PortSelector {
    /// Start with `preferred` (if any) listed and selected.
    pub fn new(preferred: Option<String>) -> Self {
        let ports: Vec<String> = preferred.into_iter().filter(|p| !p.is_empty()).collect();
        let selected = if ports.is_empty() { None } else { Some(0) };
        Self {
            ports,
            selected,
            pending_refresh: None,
        }
    }

    pub fn ports(&self) -> &[String] {
        &self.ports
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Selected port name, empty when nothing is selected
    pub fn selected_port(&self) -> &str {
        self.selected
            .and_then(|i| self.ports.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Replace the list, keeping the previous selection when still present.
    ///
    /// A selected port that vanished leaves nothing selected, so a connect
    /// never silently goes to a different device. With no prior selection
    /// the first port is picked.
    pub fn replace(&mut self, ports: Vec<String>) {
        let previous = self.selected_port().to_string();
        self.ports = ports;
        self.selected = if previous.is_empty() {
            if self.ports.is_empty() {
                None
            } else {
                Some(0)
            }
        } else {
            self.ports.iter().position(|p| *p == previous)
        };
        debug!(
            "Port list replaced ({} ports), selected {:?}",
            self.ports.len(),
            self.selected_port()
        );
    }

    pub fn select_next(&mut self) {
        if self.ports.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.ports.len(),
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.ports.is_empty() {
            return;
        }
        let len = self.ports.len();
        self.selected = Some(match self.selected {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BaudSelector
// ─────────────────────────────────────────────────────────────────────────────

/// Baud rate choice over a fixed list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaudSelector {
    rates: Vec<u32>,
    selected: usize,
}

impl BaudSelector {
    /// `rates` must contain `initial`; otherwise the first rate is selected.
    pub fn new(rates: Vec<u32>, initial: u32) -> Self {
        let rates = if rates.is_empty() { vec![initial] } else { rates };
        let selected = rates.iter().position(|r| *r == initial).unwrap_or(0);
        Self { rates, selected }
    }

    pub fn rates(&self) -> &[u32] {
        &self.rates
    }

    pub fn selected(&self) -> u32 {
        self.rates.get(self.selected).copied().unwrap_or_default()
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.rates.len();
    }

    pub fn select_previous(&mut self) {
        let len = self.rates.len();
        self.selected = (self.selected + len - 1) % len;
    }
}
