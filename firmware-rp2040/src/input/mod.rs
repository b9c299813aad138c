//! Hardware input collaborators.
//!
//! - [`buttons`]: GPIO button lines ([`GpioButtons`]) and the activity LED ([`Led`])
//! - [`analog`]: ADC conversions handed over from the ADC task ([`AdcSampler`])

pub mod analog;
pub mod buttons;

pub use analog::{run_adc, AdcChannels, AdcSampler};
pub use buttons::{GpioButtons, Led};
