//! Analog sample to report-field mapping.
//!
//! The stick axes and the trigger potentiometer are sampled by a 12-bit ADC
//! (0-4095). The stick maps to a signed 8-bit axis; the potentiometer is a
//! rocker centered at mid-scale that drives either the left or the right
//! trigger, never both.

/// Largest value a 12-bit conversion can produce.
pub const ADC_MAX: u16 = 4095;

/// Axis value that maps to zero deflection.
pub const AXIS_CENTER: u16 = 2047;

/// Potentiometer rest position: both triggers released.
pub const POT_CENTER: u16 = 2048;

/// One set of raw conversions, one per analog channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisSample {
    /// Joystick X axis.
    pub x: u16,
    /// Joystick Y axis.
    pub y: u16,
    /// Trigger potentiometer.
    pub pot: u16,
}

/// Report fields derived from an [`AxisSample`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisReading {
    pub x: i8,
    pub y: i8,
    pub left_trigger: u8,
    pub right_trigger: u8,
}

impl AxisReading {
    /// Sticks centered, triggers released.
    pub const NEUTRAL: Self = Self {
        x: 0,
        y: 0,
        left_trigger: 0,
        right_trigger: 0,
    };
}

impl AxisSample {
    #[must_use]
    pub const fn new(x: u16, y: u16, pot: u16) -> Self {
        Self { x, y, pot }
    }

    /// Map all channels to report fields.
    #[must_use]
    pub fn map(&self) -> AxisReading {
        let (left_trigger, right_trigger) = pot_to_triggers(self.pot);
        AxisReading {
            x: axis_to_i8(self.x),
            y: axis_to_i8(self.y),
            left_trigger,
            right_trigger,
        }
    }
}

/// Convert a 12-bit stick conversion to a signed 8-bit axis.
///
/// Computes `(2047 - raw) >> 4`: 0 maps to 127, 2047 to 0 and 4095 to -128.
/// The axis is inverted on purpose so that pushing the stick towards the
/// high end of the ADC range reads as a negative deflection.
#[inline]
#[must_use]
pub fn axis_to_i8(raw: u16) -> i8 {
    let raw = i32::from(raw & ADC_MAX);
    // Arithmetic shift keeps the result in -128..=127 for the 12-bit domain.
    ((i32::from(AXIS_CENTER) - raw) >> 4) as i8
}

/// Split the potentiometer into `(left_trigger, right_trigger)`.
///
/// Below center drives the left trigger, above center the right one. The two
/// halves use different divisors (2048 below, 2047 above) so both ends reach
/// exactly 255. Results are rounded to the nearest step.
#[inline]
#[must_use]
pub fn pot_to_triggers(raw: u16) -> (u8, u8) {
    let raw = u32::from(raw & ADC_MAX);
    let center = u32::from(POT_CENTER);

    if raw < center {
        (scale_rounded(center - raw, center), 0)
    } else if raw > center {
        (0, scale_rounded(raw - center, u32::from(ADC_MAX) - center))
    } else {
        (0, 0)
    }
}

/// `round(offset * 255 / span)`, with `offset <= span`.
#[inline]
fn scale_rounded(offset: u32, span: u32) -> u8 {
    ((offset * 255 + span / 2) / span).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_anchor_points() {
        assert_eq!(axis_to_i8(0), 127);
        assert_eq!(axis_to_i8(1023), 64);
        assert_eq!(axis_to_i8(AXIS_CENTER), 0);
        assert_eq!(axis_to_i8(2048), -1);
        assert_eq!(axis_to_i8(ADC_MAX), -128);
    }

    #[test]
    fn test_axis_polarity_is_inverted() {
        // Kept as calibrated on the hardware: larger conversions read lower.
        assert!(axis_to_i8(3000) < axis_to_i8(1000));
    }

    #[test]
    fn test_axis_monotonic_over_domain() {
        let mut previous = axis_to_i8(0);
        for raw in 1..=ADC_MAX {
            let value = axis_to_i8(raw);
            assert!(value <= previous, "axis rose at raw={raw}");
            previous = value;
        }
    }

    #[test]
    fn test_axis_ignores_bits_above_twelve() {
        assert_eq!(axis_to_i8(0x1000), axis_to_i8(0));
        assert_eq!(axis_to_i8(0xFFFF), axis_to_i8(ADC_MAX));
    }

    #[test]
    fn test_pot_center_releases_both() {
        assert_eq!(pot_to_triggers(POT_CENTER), (0, 0));
    }

    #[test]
    fn test_pot_ends_reach_full_scale() {
        assert_eq!(pot_to_triggers(0), (255, 0));
        assert_eq!(pot_to_triggers(ADC_MAX), (0, 255));
    }

    #[test]
    fn test_pot_midpoints_round() {
        // 1024 * 255 / 2048 = 127.5
        assert_eq!(pot_to_triggers(1024), (128, 0));
        // 1023 * 255 / 2047 = 127.44
        assert_eq!(pot_to_triggers(3071), (0, 127));
        // Small offsets round to zero on either side of the rest position.
        assert_eq!(pot_to_triggers(2047), (0, 0));
        assert_eq!(pot_to_triggers(2049), (0, 0));
        assert_eq!(pot_to_triggers(2044), (0, 0));
        assert_eq!(pot_to_triggers(2043), (1, 0));
    }

    #[test]
    fn test_triggers_are_exclusive() {
        for raw in 0..=ADC_MAX {
            let (left, right) = pot_to_triggers(raw);
            assert!(left == 0 || right == 0, "both triggers set at raw={raw}");
        }
    }

    #[test]
    fn test_sample_map() {
        let reading = AxisSample::new(0, ADC_MAX, 0).map();
        assert_eq!(
            reading,
            AxisReading {
                x: 127,
                y: -128,
                left_trigger: 255,
                right_trigger: 0,
            }
        );
    }

    #[test]
    fn test_default_sample_maps_to_left_full() {
        // An all-zero sample is not neutral: the rocker sits at one end.
        let reading = AxisSample::default().map();
        assert_eq!(reading.left_trigger, 255);
        assert_ne!(reading, AxisReading::NEUTRAL);
    }
}
