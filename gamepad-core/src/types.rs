//! Core gamepad types: Buttons and the BitField abstraction used by the debouncer.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// Any fixed-width bit-field the debouncer can operate on, one bit per line.
///
/// Blanket-implemented for every type with the required operators, so plain
/// `u8`/`u16`/`u32` work as well as [`Buttons`].
pub trait BitField:
    Copy
    + Default
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
}

impl<T> BitField for T where
    T: Copy
        + Default
        + Eq
        + BitAnd<Output = T>
        + BitOr<Output = T>
        + BitXor<Output = T>
        + Not<Output = T>
{
}

/// Digital line state represented as a bitfield, one bit per monitored line.
///
/// The pad has four push-buttons and the joystick's push switch. A set bit
/// means the line is asserted (pressed).
///
/// # Example
///
/// ```
/// use gamepad_core::Buttons;
///
/// let buttons = Buttons::BUTTON1 | Buttons::JOYSTICK;
/// assert!(buttons.contains(Buttons::BUTTON1));
/// assert!(buttons.contains(Buttons::JOYSTICK));
/// assert!(!buttons.contains(Buttons::BUTTON2));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(pub u8);

impl Buttons {
    pub const BUTTON1: Self = Self(1 << 0);
    pub const BUTTON2: Self = Self(1 << 1);
    pub const BUTTON3: Self = Self(1 << 2);
    pub const BUTTON4: Self = Self(1 << 3);
    pub const JOYSTICK: Self = Self(1 << 4); // Stick push switch

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Every monitored line.
    pub const ALL: Self = Self(0x1F);

    /// Number of monitored lines.
    pub const COUNT: usize = 5;

    /// Build from a raw value, dropping bits beyond the monitored lines.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & Self::ALL.0)
    }

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: Buttons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Check if the given button is pressed (alias for contains).
    #[inline]
    #[must_use]
    pub const fn is_pressed(self, button: Buttons) -> bool {
        self.contains(button)
    }

    /// Check whether any of the given lines is set.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Buttons) -> bool {
        (self.0 & other.0) != 0
    }

    /// Set or clear button(s).
    #[inline]
    pub fn set(&mut self, button: Buttons, pressed: bool) {
        if pressed {
            self.0 |= button.0;
        } else {
            self.0 &= !button.0;
        }
    }

    /// Get the raw u8 value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Check if no buttons are pressed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Buttons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Buttons {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Buttons {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitXor for Buttons {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Buttons {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

// Full-width complement; bits above ALL are only cleared by a later mask.
impl Not for Buttons {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_bitwise_or() {
        let buttons = Buttons::BUTTON1 | Buttons::BUTTON2;
        assert!(buttons.contains(Buttons::BUTTON1));
        assert!(buttons.contains(Buttons::BUTTON2));
        assert!(!buttons.contains(Buttons::BUTTON3));
    }

    #[test]
    fn test_buttons_set_clear() {
        let mut buttons = Buttons::NONE;
        buttons.set(Buttons::JOYSTICK, true);
        assert!(buttons.is_pressed(Buttons::JOYSTICK));
        buttons.set(Buttons::JOYSTICK, false);
        assert!(!buttons.is_pressed(Buttons::JOYSTICK));
        assert!(buttons.is_empty());
    }

    #[test]
    fn test_buttons_from_raw_masks_unused_bits() {
        assert_eq!(Buttons::from_raw(0xFF), Buttons::ALL);
        assert_eq!(Buttons::from_raw(0x21), Buttons::BUTTON1);
    }

    #[test]
    fn test_buttons_xor_toggles_polarity() {
        let raw = Buttons::BUTTON2;
        let normalized = raw ^ Buttons::JOYSTICK;
        assert_eq!(normalized, Buttons::BUTTON2 | Buttons::JOYSTICK);
    }

    #[test]
    fn test_all_covers_every_line() {
        let every = Buttons::BUTTON1
            | Buttons::BUTTON2
            | Buttons::BUTTON3
            | Buttons::BUTTON4
            | Buttons::JOYSTICK;
        assert_eq!(every, Buttons::ALL);
        assert_eq!(Buttons::ALL.raw().count_ones() as usize, Buttons::COUNT);
    }
}
