//! ADC conversions for the joystick axes and the trigger rocker.
//!
//! The ADC task converts all three channels, publishes the set and then waits
//! until the foreground has taken it before starting the next conversion. The
//! converter therefore runs freely but never ahead of the consumer.
//!
//! # Pins
//!
//! - GPIO 26 (ADC0): Joystick X
//! - GPIO 27 (ADC1): Joystick Y
//! - GPIO 28 (ADC2): Trigger potentiometer

use defmt::warn;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use gamepad_core::{AnalogInput, AxisSample};

/// Hand-over point between the ADC task and the foreground.
pub struct AdcSampler {
    ready: &'static Signal<CriticalSectionRawMutex, AxisSample>,
    consumed: &'static Signal<CriticalSectionRawMutex, ()>,
}

impl AdcSampler {
    #[must_use]
    pub fn new(
        ready: &'static Signal<CriticalSectionRawMutex, AxisSample>,
        consumed: &'static Signal<CriticalSectionRawMutex, ()>,
    ) -> Self {
        Self { ready, consumed }
    }
}

impl AnalogInput for AdcSampler {
    fn try_read(&mut self) -> Option<AxisSample> {
        let sample = self.ready.try_take()?;
        // Start the next conversion straight away.
        self.consumed.signal(());
        Some(sample)
    }
}

/// The three analog inputs, in report order.
pub struct AdcChannels<'d> {
    pub x: Channel<'d>,
    pub y: Channel<'d>,
    pub pot: Channel<'d>,
}

/// Convert forever, publishing one [`AxisSample`] per consumed set.
///
/// A failed conversion is logged and retried; the foreground keeps using
/// the last good values meanwhile.
pub async fn run_adc(
    adc: &mut Adc<'_, Async>,
    channels: &mut AdcChannels<'_>,
    ready: &Signal<CriticalSectionRawMutex, AxisSample>,
    consumed: &Signal<CriticalSectionRawMutex, ()>,
) -> ! {
    loop {
        match convert(adc, channels).await {
            Ok(sample) => {
                ready.signal(sample);
                consumed.wait().await;
            }
            Err(e) => warn!("ADC conversion failed: {:?}", e),
        }
    }
}

async fn convert(
    adc: &mut Adc<'_, Async>,
    channels: &mut AdcChannels<'_>,
) -> Result<AxisSample, embassy_rp::adc::Error> {
    let x = adc.read(&mut channels.x).await?;
    let y = adc.read(&mut channels.y).await?;
    let pot = adc.read(&mut channels.pot).await?;
    Ok(AxisSample::new(x, y, pot))
}
