//! Compile-time bridge configuration.

use crate::types::Buttons;

/// Configuration for [`GamepadBridge`](crate::GamepadBridge).
///
/// Customize this at compile-time by creating your own const.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// Lines that read low when pressed. They are inverted before
    /// debouncing so a set bit always means pressed.
    pub active_low: Buttons,
    /// Sends between activity indicator flashes.
    pub activity_interval: u32,
    /// Foreground poll period. Four polls make up the debounce window.
    pub poll_interval_ms: u64,
}

/// Default configuration for the pad wiring.
///
/// - Buttons 1-4 are active-high, the joystick switch is active-low
/// - The activity LED flashes once every 41 reports
/// - Polling every 5 ms gives a 20 ms debounce window
pub const DEFAULT_CONFIG: BridgeConfig = BridgeConfig {
    active_low: Buttons::JOYSTICK,
    activity_interval: 40,
    poll_interval_ms: 5,
};

impl Default for BridgeConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}
