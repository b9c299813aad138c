//! Output collaborator traits and error types.

use crate::report::GamepadReport;

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// A report is already in flight.
    Busy,
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
}

/// Hands reports to the transport.
///
/// `send` must not block: it either accepts the report for transmission or
/// declines it. Completion is reported separately, as a
/// [`SessionEvent::TransmissionComplete`](crate::SessionEvent).
pub trait ReportSink {
    /// Queue a report for transmission.
    fn send(&mut self, report: &GamepadReport) -> Result<(), OutputError>;
}

/// On/off output showing report activity, usually an LED.
pub trait ActivityIndicator {
    fn set_active(&mut self, on: bool);
}
