#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Async, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;
use usb_gamepad_rp2040::input::{run_adc, AdcChannels};
use usb_gamepad_rp2040::{
    configure_usb_hid, AdcSampler, AxisSample, GamepadBridge, GamepadReport,
    GamepadRequestHandler, GpioButtons, Led, PollOutcome, ReportCell, SessionHandler,
    SharedSession, SignalReportSink, UsbHidOutput, DEFAULT_CONFIG,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

type Bridge = GamepadBridge<
    'static,
    CriticalSectionRawMutex,
    GpioButtons<Input<'static>>,
    AdcSampler,
    SignalReportSink,
    Led<Output<'static>>,
>;

/// Host session, driven by USB events and claimed by the poll task.
static SESSION: SharedSession<CriticalSectionRawMutex> = SharedSession::new();

/// Last synthesized report, served on GET_REPORT.
static REPORT: ReportCell<CriticalSectionRawMutex> = ReportCell::new();

/// Accepted report waiting for the output task.
static REPORT_SIGNAL: Signal<CriticalSectionRawMutex, GamepadReport> = Signal::new();

/// Finished ADC conversion, and the request for the next one.
static ADC_READY: Signal<CriticalSectionRawMutex, AxisSample> = Signal::new();
static ADC_CONSUMED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state and handlers.
static HID_STATE: StaticCell<State> = StaticCell::new();
static REQUEST_HANDLER: StaticCell<GamepadRequestHandler> = StaticCell::new();
static SESSION_HANDLER: StaticCell<SessionHandler> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("USB gamepad starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Digital inputs ---
    let buttons = GpioButtons::new([
        Input::new(p.PIN_2, Pull::Down),
        Input::new(p.PIN_3, Pull::Down),
        Input::new(p.PIN_4, Pull::Down),
        Input::new(p.PIN_5, Pull::Down),
        Input::new(p.PIN_6, Pull::Up), // joystick switch
    ]);
    let led = Led::new(Output::new(p.PIN_25, Level::Low));

    // --- ADC Setup ---
    let adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let channels = AdcChannels {
        x: Channel::new_pin(p.PIN_26, Pull::None),
        y: Channel::new_pin(p.PIN_27, Pull::None),
        pot: Channel::new_pin(p.PIN_28, Pull::None),
    };

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Rust Gamepad");
    usb_config.product = Some("USB Gamepad");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    builder.handler(SESSION_HANDLER.init(SessionHandler::new(&SESSION)));

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let request_handler = REQUEST_HANDLER.init(GamepadRequestHandler::new(&REPORT));
    let hid_writer = configure_usb_hid(&mut builder, hid_state, request_handler);

    let usb_device = builder.build();
    let usb_output = UsbHidOutput::new(hid_writer, &SESSION);

    let bridge = GamepadBridge::new(
        buttons,
        AdcSampler::new(&ADC_READY, &ADC_CONSUMED),
        SignalReportSink::new(&REPORT_SIGNAL),
        led,
        &SESSION,
        &REPORT,
        &DEFAULT_CONFIG,
    );

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(adc_task(adc, channels).unwrap());
    spawner.spawn(poll_task(bridge).unwrap());
    spawner.spawn(output_task(usb_output).unwrap());

    info!("USB gamepad initialized, waiting for host...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// ADC task - converts the analog channels one set at a time.
#[embassy_executor::task]
async fn adc_task(mut adc: Adc<'static, Async>, mut channels: AdcChannels<'static>) {
    run_adc(&mut adc, &mut channels, &ADC_READY, &ADC_CONSUMED).await
}

/// Poll task - debounces, maps and gates one report per tick.
#[embassy_executor::task]
async fn poll_task(mut bridge: Bridge) {
    let mut ticker = Ticker::every(Duration::from_millis(DEFAULT_CONFIG.poll_interval_ms));
    loop {
        match bridge.poll_once() {
            Ok(PollOutcome::Sent(report)) => defmt::trace!("Report: {:?}", report),
            Ok(_) => {}
            Err(e) => warn!("Poll error: {:?}", e),
        }
        ticker.next().await;
    }
}

/// Output task - writes accepted reports to the HID endpoint.
#[embassy_executor::task]
async fn output_task(mut output: UsbHidOutput) {
    // Wait for USB to be ready
    output.wait_ready().await;
    info!("USB HID ready, sending reports...");

    output.run(&REPORT_SIGNAL).await
}
