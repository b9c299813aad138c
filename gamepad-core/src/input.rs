//! Input collaborator traits.

use crate::analog::AxisSample;
use crate::types::Buttons;

/// Reads the raw level of every monitored digital line.
///
/// Implementations return line levels as wired; active-low lines are
/// normalized by the bridge (see [`BridgeConfig::active_low`](crate::BridgeConfig)).
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait DigitalInput {
    /// Sample all lines once. Called once per poll tick.
    fn read_raw(&mut self) -> Buttons;
}

/// Source of analog conversions.
///
/// The converter runs freely: a new conversion is started as soon as the
/// previous result has been taken.
pub trait AnalogInput {
    /// Take the latest completed conversion set, if one is ready.
    ///
    /// Returns `None` when nothing new has completed since the last call; the
    /// caller keeps using the previous values.
    fn try_read(&mut self) -> Option<AxisSample>;
}

impl<F: FnMut() -> Buttons> DigitalInput for F {
    fn read_raw(&mut self) -> Buttons {
        self()
    }
}
