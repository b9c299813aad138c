//! USB HID gamepad firmware for RP2040.
//!
//! This crate binds the platform-agnostic [`gamepad_core`] pipeline to the
//! RP2040's GPIO, ADC and USB peripherals.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Samples four push-buttons and the joystick switch every poll tick
//! 2. Debounces them and maps the joystick and trigger rocker conversions
//! 3. Sends a 5-byte HID gamepad report whenever something changed and the
//!    host is ready for it
//!
//! # Hardware Configuration
//!
//! | Function        | GPIO | Description |
//! |-----------------|------|-------------|
//! | Button 1-4      | 2-5  | Push-buttons, active high (pull-down) |
//! | Joystick switch | 6    | Stick push, active low (pull-up) |
//! | Joystick X      | 26   | ADC0 |
//! | Joystick Y      | 27   | ADC1 |
//! | Trigger rocker  | 28   | ADC2, rest position at mid-scale |
//! | LED             | 25   | On-board LED (report activity) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with four concurrent tasks:
//!
//! - **USB Task**: Runs the USB device stack; its [`SessionHandler`] turns
//!   bus events into [`SessionEvent`]s
//! - **ADC Task**: Converts the three analog channels, one set at a time
//! - **Poll Task**: Ticks the [`GamepadBridge`] (debounce, map, gate, send)
//! - **Output Task**: Writes each accepted report to the HID endpoint and
//!   reports completion back to the session
//!
//! The session and the current report live in statics guarded by
//! `CriticalSectionRawMutex`; reports and conversions are passed between
//! tasks through Embassy [`Signal`](embassy_sync::signal::Signal)s.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`gamepad_core`] that the
//! binary needs, so consumers only need to depend on this crate.

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

// Re-export core types for convenience
pub use gamepad_core::{
    ActivityIndicator, AnalogInput, AxisSample, BridgeConfig, BridgeError, Buttons, DigitalInput,
    GamepadBridge, GamepadReport, OutputError, PollOutcome, ReportCell, ReportSink, SessionEvent,
    SessionState, SharedSession, DEFAULT_CONFIG,
};

pub mod input;
pub mod usb_output;

pub use input::{AdcSampler, GpioButtons, Led};
pub use usb_output::{
    configure_usb_hid, GamepadRequestHandler, SessionHandler, SignalReportSink, UsbHidOutput,
    REPORT_DESCRIPTOR,
};
