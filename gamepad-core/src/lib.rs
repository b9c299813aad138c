//! Platform-agnostic input debouncing, report synthesis and session gating
//! for a USB HID gamepad.
//!
//! This crate provides the core of the gamepad firmware without any
//! platform-specific dependencies. It can be used both in embedded `no_std`
//! environments and on host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`types`]: Button bitfield ([`Buttons`]) and the [`BitField`] abstraction
//! - [`debounce`]: Bit-parallel switch debouncing ([`Debouncer`])
//! - [`analog`]: ADC sample to axis/trigger mapping ([`AxisSample`], [`axis_to_i8`], [`pot_to_triggers`])
//! - [`report`]: The HID report value ([`GamepadReport`]) and its shared cell ([`ReportCell`])
//! - [`session`]: Host session state machine ([`Session`], [`SharedSession`])
//! - [`input`]: Input collaborator traits ([`DigitalInput`], [`AnalogInput`])
//! - [`output`]: Output collaborator traits ([`ReportSink`], [`ActivityIndicator`])
//! - [`indicator`]: Rate-limited activity LED ([`ActivityBlinker`])
//! - [`bridge`]: Orchestrates one poll cycle ([`GamepadBridge`])
//!
//! # Data flow
//!
//! ```text
//! raw lines -> Debouncer -> debounced buttons --+
//!                                               +-> GamepadReport -> ReportSink
//! ADC sample -> AxisSample::map -> AxisReading -+        (only while the session is Idle)
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded)
//! - **`log`**: Log through the `log` facade instead
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod analog;
pub mod bridge;
pub mod config;
pub mod debounce;
pub mod indicator;
pub mod input;
pub mod output;
pub mod report;
pub mod session;
pub mod types;

// Re-export main types at crate root
pub use analog::{axis_to_i8, pot_to_triggers, AxisReading, AxisSample, ADC_MAX, POT_CENTER};
pub use bridge::{BridgeError, GamepadBridge, PollOutcome};
pub use config::{BridgeConfig, DEFAULT_CONFIG};
pub use debounce::{DebounceOutput, Debouncer, DEBOUNCE_POLLS};
pub use indicator::ActivityBlinker;
pub use input::{AnalogInput, DigitalInput};
pub use output::{ActivityIndicator, OutputError, ReportSink};
pub use report::{GamepadReport, ReportCell};
pub use session::{Session, SessionEvent, SessionState, SharedSession, Transition};
pub use types::{BitField, Buttons};
