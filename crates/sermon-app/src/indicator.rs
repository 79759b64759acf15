//! RX/TX activity indicators

use std::time::{Duration, Instant};

/// How long an indicator stays lit after a pulse
pub const FLASH_DURATION: Duration = Duration::from_millis(150);

/// A transient on/off light.
///
/// A pulse lights it until `now + FLASH_DURATION`; pulsing again while lit
/// restarts the window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorFlasher {
    active_until: Option<Instant>,
}

impl IndicatorFlasher {
    pub fn pulse(&mut self, now: Instant) {
        self.active_until = Some(now + FLASH_DURATION);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.active_until.is_some_and(|until| now < until)
    }

    /// Forget an expired pulse. Returns `true` if the light just went out.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.active_until {
            Some(until) if now >= until => {
                self.active_until = None;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.active_until = None;
    }
}

/// The receive and transmit lights
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Indicators {
    pub rx: IndicatorFlasher,
    pub tx: IndicatorFlasher,
}

impl Indicators {
    pub fn expire(&mut self, now: Instant) {
        self.rx.expire(now);
        self.tx.expire(now);
    }
}
