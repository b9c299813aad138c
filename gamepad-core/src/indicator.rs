//! Rate-limited activity indicator.

use crate::output::ActivityIndicator;

/// Drives an [`ActivityIndicator`] at a human-visible rate.
///
/// Reports go out every few milliseconds, far too fast to see. The blinker
/// switches the indicator on once every `interval + 1` sends; the session
/// switches it off again on completion, suspend and resume.
pub struct ActivityBlinker<L> {
    indicator: L,
    interval: u32,
    updates: u32,
}

impl<L: ActivityIndicator> ActivityBlinker<L> {
    /// Create a blinker that lights after every `interval + 1` sends.
    pub fn new(indicator: L, interval: u32) -> Self {
        Self {
            indicator,
            interval,
            updates: 0,
        }
    }

    /// Record one successful send.
    pub fn record_send(&mut self) {
        if self.updates == self.interval {
            self.indicator.set_active(true);
            self.updates = 0;
        } else {
            self.updates += 1;
        }
    }

    /// Switch the indicator off.
    pub fn clear(&mut self) {
        self.indicator.set_active(false);
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    pub fn indicator_mut(&mut self) -> &mut L {
        &mut self.indicator
    }

    pub fn into_indicator(self) -> L {
        self.indicator
    }
}
