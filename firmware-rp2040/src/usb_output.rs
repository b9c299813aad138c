//! USB HID gamepad output implementation.
//!
//! The foreground hands accepted reports to [`SignalReportSink`]; the output
//! task drains them through [`UsbHidOutput`] and reports each completed write
//! back to the session. Bus events from the USB stack reach the session
//! through [`SessionHandler`].

use defmt::{info, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Handler};
use gamepad_core::{
    GamepadReport, OutputError, ReportCell, ReportSink, SessionEvent, SharedSession,
};

/// Largest input report the HID endpoint carries.
pub const MAX_REPORT_SIZE: usize = 8;

/// Standard HID Gamepad Report Descriptor.
///
/// This descriptor defines a gamepad with:
/// - 1 analog stick (X/Y, signed 8-bit)
/// - 2 triggers (Z/Rz, unsigned 8-bit)
/// - 5 buttons plus 3 bits of padding
///
/// Field order matches [`GamepadReport::as_bytes`].
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Stick ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x15, 0x80, //   Logical Minimum (-128)
    0x25, 0x7F, //   Logical Maximum (127)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x02, //   Report Count (2)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Triggers ---
    0x09, 0x32, //   Usage (Z) - Left trigger
    0x09, 0x35, //   Usage (Rz) - Right trigger
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x02, //   Report Count (2)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Buttons (4 buttons + joystick switch) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x05, //   Usage Maximum (Button 5)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x05, //   Report Count (5)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Padding to a full byte ---
    0x75, 0x01, //   Report Size (1)
    0x95, 0x03, //   Report Count (3)
    0x81, 0x01, //   Input (Constant, Array, Absolute)
    //
    0xC0, // End Collection
];

// The descriptor's input items must describe exactly the bytes we send.
const _: () = assert!(input_report_bits(REPORT_DESCRIPTOR) == GamepadReport::SIZE * 8);

/// Total bits of all Input main items in a HID report descriptor.
const fn input_report_bits(desc: &[u8]) -> usize {
    let mut i = 0;
    let mut size = 0;
    let mut count = 0;
    let mut bits = 0;
    while i < desc.len() {
        let prefix = desc[i];
        let len = match prefix & 0x03 {
            3 => 4,
            n => n as usize,
        };
        let mut value = 0usize;
        let mut k = 0;
        while k < len {
            value |= (desc[i + 1 + k] as usize) << (8 * k);
            k += 1;
        }
        match prefix & 0xFC {
            0x74 => size = value,  // Report Size
            0x94 => count = value, // Report Count
            0x80 => bits += size * count,
            _ => {}
        }
        i += 1 + len;
    }
    bits
}

type UsbDriver = Driver<'static, USB>;

/// Non-blocking [`ReportSink`] in front of the output task.
///
/// Holds at most one report: a second `send` before the output task has
/// picked up the first is declined with [`OutputError::Busy`].
pub struct SignalReportSink {
    signal: &'static Signal<CriticalSectionRawMutex, GamepadReport>,
}

impl SignalReportSink {
    #[must_use]
    pub fn new(signal: &'static Signal<CriticalSectionRawMutex, GamepadReport>) -> Self {
        Self { signal }
    }
}

impl ReportSink for SignalReportSink {
    fn send(&mut self, report: &GamepadReport) -> Result<(), OutputError> {
        if self.signal.signaled() {
            return Err(OutputError::Busy);
        }
        self.signal.signal(*report);
        Ok(())
    }
}

/// USB HID gamepad output.
///
/// Wraps an embassy-usb HID writer to send gamepad reports.
pub struct UsbHidOutput {
    writer: HidWriter<'static, UsbDriver, MAX_REPORT_SIZE>,
    session: &'static SharedSession<CriticalSectionRawMutex>,
}

impl UsbHidOutput {
    /// Create a new USB HID output from the given HID writer.
    pub fn new(
        writer: HidWriter<'static, UsbDriver, MAX_REPORT_SIZE>,
        session: &'static SharedSession<CriticalSectionRawMutex>,
    ) -> Self {
        Self { writer, session }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
    }

    /// Write one report and signal its completion to the session.
    ///
    /// Completion is signalled even when the write fails, so a failed
    /// transfer can never leave the session stuck in `Sending`.
    pub async fn transmit(&mut self, report: &GamepadReport) -> Result<(), OutputError> {
        let result = self
            .writer
            .write(&report.as_bytes())
            .await
            .map_err(|_| OutputError::Io);
        let _ = self.session.dispatch(SessionEvent::TransmissionComplete);
        result
    }

    /// Forward reports from `reports` to the host forever.
    pub async fn run(
        &mut self,
        reports: &Signal<CriticalSectionRawMutex, GamepadReport>,
    ) -> ! {
        loop {
            let report = reports.wait().await;
            if let Err(e) = self.transmit(&report).await {
                warn!("Output error: {:?}", e);
            }
        }
    }
}

/// HID request handler.
///
/// Answers GET_REPORT with the most recently synthesized report, whatever
/// the session state. Output reports are accepted and ignored.
pub struct GamepadRequestHandler {
    report: &'static ReportCell<CriticalSectionRawMutex>,
}

impl GamepadRequestHandler {
    #[must_use]
    pub fn new(report: &'static ReportCell<CriticalSectionRawMutex>) -> Self {
        Self { report }
    }
}

impl RequestHandler for GamepadRequestHandler {
    fn get_report(&mut self, _id: ReportId, buf: &mut [u8]) -> Option<usize> {
        self.report.write_bytes(buf)
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// USB device event handler feeding the session state machine.
///
/// Runs in the USB task, i.e. the event context.
pub struct SessionHandler {
    session: &'static SharedSession<CriticalSectionRawMutex>,
}

impl SessionHandler {
    #[must_use]
    pub fn new(session: &'static SharedSession<CriticalSectionRawMutex>) -> Self {
        Self { session }
    }

    fn dispatch(&self, event: SessionEvent) {
        let _ = self.session.dispatch(event);
    }
}

impl Handler for SessionHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            info!("USB disabled");
            self.dispatch(SessionEvent::Disconnected);
        }
    }

    fn reset(&mut self) {
        self.dispatch(SessionEvent::Disconnected);
    }

    fn configured(&mut self, configured: bool) {
        if configured {
            info!("Host connected");
            self.dispatch(SessionEvent::Connected);
        } else {
            info!("Host disconnected");
            self.dispatch(SessionEvent::Disconnected);
        }
    }

    fn suspended(&mut self, suspended: bool) {
        if suspended {
            info!("Bus suspended");
            self.dispatch(SessionEvent::Suspend);
        } else {
            info!("Bus resumed");
            self.dispatch(SessionEvent::Resume);
        }
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid(
    builder: &mut Builder<'static, UsbDriver>,
    state: &'static mut State<'static>,
    request_handler: &'static mut GamepadRequestHandler,
) -> HidWriter<'static, UsbDriver, MAX_REPORT_SIZE> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(request_handler),
        poll_ms: 1,
        max_packet_size: MAX_REPORT_SIZE as u16,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
