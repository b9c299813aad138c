//! GPIO-backed digital lines and activity LED.
//!
//! # Pins
//!
//! - GPIO 2-5: Buttons 1-4 (bits 0-3), active high with pull-downs
//! - GPIO 6: Joystick switch (bit 4), active low with pull-up
//! - GPIO 25: On-board LED

use embedded_hal::digital::{InputPin, OutputPin};
use gamepad_core::{ActivityIndicator, Buttons, DigitalInput};

/// Reads one GPIO per monitored line into a packed [`Buttons`] value.
///
/// Line `i` of the array becomes bit `i`. Levels are reported as read;
/// active-low lines are inverted by the bridge.
pub struct GpioButtons<P> {
    lines: [P; Buttons::COUNT],
}

impl<P: InputPin> GpioButtons<P> {
    /// Create from pins in bit order: buttons 1-4, then the joystick switch.
    #[must_use]
    pub fn new(lines: [P; Buttons::COUNT]) -> Self {
        Self { lines }
    }
}

impl<P: InputPin> DigitalInput for GpioButtons<P> {
    fn read_raw(&mut self) -> Buttons {
        let mut raw = 0u8;
        for (bit, line) in self.lines.iter_mut().enumerate() {
            // A failed read counts as low for this tick.
            if line.is_high().unwrap_or(false) {
                raw |= 1 << bit;
            }
        }
        Buttons::from_raw(raw)
    }
}

/// LED on a GPIO output, lit while reports are flowing.
pub struct Led<P> {
    pin: P,
}

impl<P: OutputPin> Led<P> {
    #[must_use]
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> ActivityIndicator for Led<P> {
    fn set_active(&mut self, on: bool) {
        let _ = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}
