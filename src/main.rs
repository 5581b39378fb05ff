pub mod control;
pub mod joystick;
pub mod link;

use color_eyre::{eyre::eyre, Result};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::control::state::{ControlSnapshot, ControlState};
use crate::joystick::names::DeviceMap;
use crate::joystick::pump::PumpHandle;
use crate::joystick::watchdog::{DeviceWatchdog, JsDevice, WatchdogSettings};
use crate::link::transmitter::{TransmitterHandle, TransmitterSettings};
use crate::link::transport::{SerialOpener, Transport, TransportSettings};

/// Joystick device node.
const DEVICE_PATH: &str = "/dev/input/js0";

/// Outbound serial port.
const PORT_PATH: &str = "/dev/opencm";

/// Baud rate of the actuator link.
const BAUD_RATE: u32 = 9600;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    info!("Initializing joystick bridge");

    let token = CancellationToken::new();

    // Latest-value channel between the two flows. Starts at the fail-safe
    // snapshot so the transmitter sends safe packets before the first event.
    let (snapshot_tx, snapshot_rx) = watch::channel(ControlSnapshot::default());

    let watchdog = DeviceWatchdog::new(
        Box::new(JsDevice::new(DEVICE_PATH)),
        WatchdogSettings::default(),
    );
    let state = ControlState::new(DeviceMap::default_gamepad());
    let _pump = PumpHandle::spawn(watchdog, state, snapshot_tx, token.clone());

    let transport = Transport::connect(
        Box::new(SerialOpener::new(PORT_PATH, BAUD_RATE)),
        TransportSettings::default(),
    );
    let mut transmitter = TransmitterHandle::spawn(
        transport,
        snapshot_rx,
        TransmitterSettings::default(),
        token.clone(),
    );

    info!("Bridge running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    info!("Interrupt received, shutting down");
    token.cancel();

    // The transmit loop is joined so the last tick finishes cleanly. The
    // pump notices the cancellation after its current device read; a read
    // still parked in the driver ends with the process.
    transmitter
        .shutdown()
        .await
        .map_err(|e| eyre!("Transmitter shutdown failed: {}", e))?;

    info!("Bridge stopped");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
