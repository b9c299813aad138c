//! Bit-parallel switch debouncing.
//!
//! Every line gets a 2-bit counter, packed across two registers (`clock_a`
//! holds the high bit, `clock_b` the low bit). A counter only runs while its
//! line disagrees with the debounced state; any agreeing poll resets it. When
//! the counter wraps from 3 back to 0 the debounced bit adopts the raw value,
//! so a change has to persist for four consecutive polls to be accepted.
//!
//! The work per poll is a handful of bitwise operations regardless of how many
//! lines are monitored.

use crate::types::BitField;

/// Consecutive disagreeing polls needed before a line's debounced state flips.
pub const DEBOUNCE_POLLS: u32 = 4;

/// Result of one [`Debouncer::poll`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceOutput<T> {
    /// Debounced state after this poll (1 = asserted).
    pub state: T,
    /// Lines whose debounced state changed on this poll.
    pub delta: T,
    /// The unfiltered sample that was fed in.
    pub raw: T,
}

impl<T: BitField> DebounceOutput<T> {
    /// Lines in `mask` that became asserted on this poll.
    #[inline]
    #[must_use]
    pub fn pressed(&self, mask: T) -> T {
        mask & self.delta & self.state
    }

    /// Lines in `mask` that became released on this poll.
    #[inline]
    #[must_use]
    pub fn released(&self, mask: T) -> T {
        mask & self.delta & !self.state
    }

    /// True if any line changed on this poll.
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.delta != T::default()
    }
}

/// Debounce engine state for a set of digital lines.
///
/// The caller owns the value and threads every raw sample through
/// [`poll`](Self::poll). It must be polled at a regular cadence since the
/// debounce window is counted in polls, not wall-clock time.
///
/// # Example
///
/// ```
/// use gamepad_core::{Buttons, Debouncer};
///
/// let mut debouncer = Debouncer::new(Buttons::NONE);
/// for _ in 0..3 {
///     assert!(!debouncer.poll(Buttons::BUTTON1).changed());
/// }
/// let out = debouncer.poll(Buttons::BUTTON1);
/// assert_eq!(out.pressed(Buttons::ALL), Buttons::BUTTON1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Debouncer<T> {
    state: T,
    clock_a: T,
    clock_b: T,
}

impl<T: BitField> Debouncer<T> {
    /// Create a debouncer seeded with an immediate raw read.
    ///
    /// Lines that are already asserted at startup are reported as pressed
    /// from the first poll on, without a spurious change.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            state: initial,
            clock_a: T::default(),
            clock_b: T::default(),
        }
    }

    /// Feed one raw sample and return the debounced state and change mask.
    pub fn poll(&mut self, raw: T) -> DebounceOutput<T> {
        // Lines disagreeing with the confirmed state.
        let delta = raw ^ self.state;

        // Increment every counter by one.
        self.clock_a = self.clock_a ^ self.clock_b;
        self.clock_b = !self.clock_b;

        // Agreeing lines restart from zero.
        self.clock_a = self.clock_a & delta;
        self.clock_b = self.clock_b & delta;

        // Wrapped (or idle) counters adopt the raw value.
        let running = self.clock_a | self.clock_b;
        self.state = (self.state & running) | (!running & raw);

        DebounceOutput {
            state: self.state,
            delta: delta ^ running,
            raw,
        }
    }

    /// Current debounced state without polling.
    #[inline]
    #[must_use]
    pub fn state(&self) -> T {
        self.state
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::types::Buttons;
    use std::vec::Vec;

    fn run(debouncer: &mut Debouncer<Buttons>, samples: &[Buttons]) -> Vec<DebounceOutput<Buttons>> {
        samples.iter().map(|&raw| debouncer.poll(raw)).collect()
    }

    #[test]
    fn test_press_accepted_on_fourth_disagreeing_poll() {
        let mut debouncer = Debouncer::new(Buttons::NONE);
        let outputs = run(&mut debouncer, &[Buttons::BUTTON1; 4]);

        for out in &outputs[..3] {
            assert_eq!(out.state, Buttons::NONE);
            assert!(!out.changed());
        }
        assert_eq!(outputs[3].state, Buttons::BUTTON1);
        assert_eq!(outputs[3].delta, Buttons::BUTTON1);
        assert_eq!(outputs[3].pressed(Buttons::ALL), Buttons::BUTTON1);
    }

    #[test]
    fn test_stable_after_convergence() {
        let mut debouncer = Debouncer::new(Buttons::NONE);
        run(&mut debouncer, &[Buttons::BUTTON2; 4]);

        for _ in 0..10 {
            let out = debouncer.poll(Buttons::BUTTON2);
            assert_eq!(out.state, Buttons::BUTTON2);
            assert!(!out.changed());
        }
    }

    #[test]
    fn test_press_and_release_scenario() {
        let p = Buttons::BUTTON3;
        let n = Buttons::NONE;
        let samples = [n, p, p, p, p, n, n, n, n, n];
        let mut debouncer = Debouncer::new(n);
        let outputs = run(&mut debouncer, &samples);

        let states: Vec<bool> = outputs.iter().map(|o| o.state.contains(p)).collect();
        assert_eq!(
            states,
            [false, false, false, false, true, true, true, true, false, false]
        );

        let edges: Vec<usize> = outputs
            .iter()
            .enumerate()
            .filter(|(_, o)| o.changed())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(edges, [4, 8]);
        assert_eq!(outputs[8].released(Buttons::ALL), p);
    }

    #[test]
    fn test_three_poll_press_is_too_short() {
        // Three disagreeing polls fill the counter but do not wrap it; the
        // window is DEBOUNCE_POLLS (4) polls.
        let p = Buttons::BUTTON1;
        let n = Buttons::NONE;
        let mut debouncer = Debouncer::new(n);
        let outputs = run(&mut debouncer, &[n, p, p, p, n, n, n]);

        for out in &outputs {
            assert_eq!(out.state, n);
            assert!(!out.changed());
        }
        assert_eq!(outputs[3].raw, p);
    }

    #[test]
    fn test_single_poll_glitch_rejected() {
        let mut debouncer = Debouncer::new(Buttons::NONE);
        let g = Buttons::BUTTON4;
        let n = Buttons::NONE;
        let outputs = run(&mut debouncer, &[n, g, n, n, g, g, n, g, g, g, n, n]);

        for out in outputs {
            assert_eq!(out.state, Buttons::NONE);
            assert!(!out.changed());
        }
    }

    #[test]
    fn test_release_glitch_rejected() {
        let mut debouncer = Debouncer::new(Buttons::JOYSTICK);
        let j = Buttons::JOYSTICK;
        let n = Buttons::NONE;
        for out in run(&mut debouncer, &[j, n, j, n, n, n, j]) {
            assert_eq!(out.state, j);
            assert!(!out.changed());
        }
    }

    #[test]
    fn test_initial_state_from_first_sample() {
        let initial = Buttons::BUTTON1 | Buttons::JOYSTICK;
        let mut debouncer = Debouncer::new(initial);

        let out = debouncer.poll(initial);
        assert_eq!(out.state, initial);
        assert!(!out.changed());
    }

    #[test]
    fn test_default_starts_released() {
        let mut debouncer: Debouncer<Buttons> = Debouncer::default();
        let held = Buttons::BUTTON1;
        let outputs = run(&mut debouncer, &[held; 4]);

        assert_eq!(outputs[0].state, Buttons::NONE);
        assert_eq!(outputs[3].state, held);
        assert_eq!(outputs[3].delta, held);
    }

    #[test]
    fn test_lines_debounce_independently() {
        let mut debouncer = Debouncer::new(Buttons::NONE);
        let a = Buttons::BUTTON1;
        let b = Buttons::BUTTON2;

        // A starts two polls before B; both settle after four polls each.
        let outputs = run(&mut debouncer, &[a, a, a | b, a | b, b, b]);
        assert_eq!(outputs[3].delta, a);
        assert_eq!(outputs[3].state, a);
        // A is still counting its release while B reaches its fourth poll.
        assert_eq!(outputs[5].delta, b);
        assert_eq!(outputs[5].state, a | b);
    }

    #[test]
    fn test_raw_passthrough() {
        let mut debouncer = Debouncer::new(Buttons::NONE);
        let out = debouncer.poll(Buttons::BUTTON3);
        assert_eq!(out.raw, Buttons::BUTTON3);
        assert_eq!(out.state, Buttons::NONE);
    }

    #[test]
    fn test_state_never_exceeds_monitored_lines() {
        let mut debouncer = Debouncer::new(Buttons::NONE);
        for i in 0..64u8 {
            let out = debouncer.poll(Buttons::from_raw(i.wrapping_mul(7)));
            assert_eq!(out.state & !Buttons::ALL, Buttons::NONE);
            assert_eq!(out.delta & !Buttons::ALL, Buttons::NONE);
        }
    }

    #[test]
    fn test_works_on_plain_integers() {
        let mut debouncer = Debouncer::<u32>::new(0);
        let mut last = 0;
        for _ in 0..DEBOUNCE_POLLS {
            last = debouncer.poll(0x8000_0001).state;
        }
        assert_eq!(last, 0x8000_0001);
        assert_eq!(debouncer.state(), 0x8000_0001);
    }
}
