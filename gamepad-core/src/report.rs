//! The HID report value and the cell that publishes it to the transport.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::analog::AxisReading;
use crate::types::Buttons;

/// Gamepad input report.
///
/// Wire layout (5 bytes) follows the report descriptor order:
/// X, Y, left trigger, right trigger, then the button bits with 3 bits of
/// padding.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GamepadReport {
    /// Button bitfield (5 buttons)
    pub buttons: Buttons,
    /// Stick X (-128 to 127)
    pub x: i8,
    /// Stick Y (-128 to 127)
    pub y: i8,
    /// Left trigger (0-255)
    pub left_trigger: u8,
    /// Right trigger (0-255)
    pub right_trigger: u8,
}

impl GamepadReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 5;

    /// Neutral/zero report.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: Buttons::NONE,
            x: 0,
            y: 0,
            left_trigger: 0,
            right_trigger: 0,
        }
    }

    /// Combine debounced buttons with mapped analog values.
    #[must_use]
    pub fn new(buttons: Buttons, axes: &AxisReading) -> Self {
        Self {
            buttons: Buttons::from_raw(buttons.raw()),
            x: axes.x,
            y: axes.y,
            left_trigger: axes.left_trigger,
            right_trigger: axes.right_trigger,
        }
    }

    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        [
            self.x as u8,
            self.y as u8,
            self.left_trigger,
            self.right_trigger,
            self.buttons.raw() & Buttons::ALL.raw(),
        ]
    }
}

/// Holds the most recently synthesized report.
///
/// The foreground stores each new report; the transport's GET_REPORT
/// request loads whatever is held, stale or not. Both sides copy the whole
/// value inside one short lock so a reader never sees a torn report.
pub struct ReportCell<M: RawMutex> {
    inner: Mutex<M, Cell<GamepadReport>>,
}

impl<M: RawMutex> ReportCell<M> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(GamepadReport::neutral())),
        }
    }

    /// Publish a new report.
    pub fn store(&self, report: GamepadReport) {
        self.inner.lock(|cell| cell.set(report));
    }

    /// Latest published report.
    #[must_use]
    pub fn load(&self) -> GamepadReport {
        self.inner.lock(Cell::get)
    }

    /// Copy the latest report into `buf`, returning the number of bytes
    /// written, or `None` if `buf` is too small.
    pub fn write_bytes(&self, buf: &mut [u8]) -> Option<usize> {
        let bytes = self.load().as_bytes();
        let dst = buf.get_mut(..bytes.len())?;
        dst.copy_from_slice(&bytes);
        Some(bytes.len())
    }
}

impl<M: RawMutex> Default for ReportCell<M> {
    fn default() -> Self {
        Self::new()
    }
}
