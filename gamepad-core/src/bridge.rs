//! GamepadBridge: turns raw input samples into gated HID reports.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::analog::AxisReading;
use crate::config::BridgeConfig;
use crate::debounce::Debouncer;
use crate::indicator::ActivityBlinker;
use crate::input::{AnalogInput, DigitalInput};
use crate::output::{ActivityIndicator, OutputError, ReportSink};
use crate::report::{GamepadReport, ReportCell};
use crate::session::{SessionState, SharedSession};
use crate::types::Buttons;

/// What one [`GamepadBridge::poll_once`] cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Nothing new to report.
    Unchanged,
    /// New input is waiting but the session is not Idle.
    Skipped(SessionState),
    /// A report was handed to the transport.
    Sent(GamepadReport),
}

/// Error type for bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// The report sink declined the report.
    Output(OutputError),
}

/// The foreground side of the gamepad.
///
/// Owns the input collaborators, the debouncer and the last mapped analog
/// values, and shares the session and current report with the event context
/// through `&'a` references (usually to statics).
///
/// Every call to [`poll_once`](Self::poll_once) samples the digital lines and
/// advances the debouncer, so it must run at a fixed cadence even while no
/// host is attached. Reports are only built and sent while the session is
/// Idle; input that arrives in any other state stays pending until then.
pub struct GamepadBridge<'a, M: RawMutex, D, A, O, L> {
    digital: D,
    analog: A,
    output: O,
    blinker: ActivityBlinker<L>,
    session: &'a SharedSession<M>,
    report: &'a ReportCell<M>,
    debouncer: Debouncer<Buttons>,
    axes: AxisReading,
    active_low: Buttons,
    pending: bool,
}

impl<'a, M, D, A, O, L> GamepadBridge<'a, M, D, A, O, L>
where
    M: RawMutex,
    D: DigitalInput,
    A: AnalogInput,
    O: ReportSink,
    L: ActivityIndicator,
{
    /// Create a new bridge.
    ///
    /// Reads the digital lines once to seed the debouncer, so buttons held
    /// at power-up are reported without waiting for a debounce window.
    pub fn new(
        mut digital: D,
        analog: A,
        output: O,
        indicator: L,
        session: &'a SharedSession<M>,
        report: &'a ReportCell<M>,
        config: &BridgeConfig,
    ) -> Self {
        let initial = Buttons::from_raw((digital.read_raw() ^ config.active_low).raw());
        debug!("Initial buttons: {:?}", initial);

        Self {
            digital,
            analog,
            output,
            blinker: ActivityBlinker::new(indicator, config.activity_interval),
            session,
            report,
            debouncer: Debouncer::new(initial),
            axes: AxisReading::NEUTRAL,
            active_low: config.active_low,
            // Publish an initial report as soon as a host shows up.
            pending: true,
        }
    }

    /// Run one foreground cycle.
    ///
    /// Samples and debounces the buttons, picks up a finished analog
    /// conversion if there is one, and sends a report when something changed
    /// and the session is Idle.
    pub fn poll_once(&mut self) -> Result<PollOutcome, BridgeError> {
        if self.session.take_clear_activity() {
            self.blinker.clear();
        }

        let raw = Buttons::from_raw((self.digital.read_raw() ^ self.active_low).raw());
        let buttons = self.debouncer.poll(raw);
        if buttons.changed() {
            trace!(
                "Buttons {:?} (pressed {:?}, released {:?})",
                buttons.state,
                buttons.pressed(Buttons::ALL),
                buttons.released(Buttons::ALL)
            );
            self.pending = true;
        }

        // No new conversion: keep the last known axis values.
        if let Some(sample) = self.analog.try_read() {
            self.axes = sample.map();
            self.pending = true;
        }

        if !self.pending {
            return Ok(PollOutcome::Unchanged);
        }

        if !self.session.try_begin_send() {
            return Ok(PollOutcome::Skipped(self.session.state()));
        }

        let report = GamepadReport::new(buttons.state, &self.axes);
        self.report.store(report);

        match self.output.send(&report) {
            Ok(()) => {
                self.pending = false;
                self.blinker.record_send();
                Ok(PollOutcome::Sent(report))
            }
            Err(e) => {
                self.session.abort_send();
                warn!("Report not accepted: {:?}", e);
                Err(BridgeError::Output(e))
            }
        }
    }

    /// Current debounced button state.
    pub fn buttons(&self) -> Buttons {
        self.debouncer.state()
    }

    /// Last mapped analog values.
    pub fn axes(&self) -> AxisReading {
        self.axes
    }

    /// Get a reference to the report sink.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the report sink.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Get a reference to the activity indicator.
    pub fn indicator(&self) -> &L {
        self.blinker.indicator()
    }

    /// Decompose the bridge into its collaborators.
    pub fn into_parts(self) -> (D, A, O, L) {
        let indicator = self.blinker.into_indicator();
        (self.digital, self.analog, self.output, indicator)
    }
}
