//! Device open/reopen policies.
//!
//! Two distinct policies, one per failure situation:
//!
//! * startup: the device may not be plugged in yet, so [`DeviceWatchdog::open_blocking`]
//!   keeps trying with a fixed delay and only ever returns an open handle;
//! * mid-run read fault: one stall must not pin the whole process inside a
//!   nested retry, so [`DeviceWatchdog::reopen`] makes a single attempt and
//!   hands the decision back to the event loop.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

/// Opens the input device. Boxed behind a trait so the watchdog can be
/// exercised without hardware.
pub trait DeviceOpener: Send {
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Human-readable identity of the device, used in log output.
    fn describe(&self) -> String;
}

/// Opener for the real joystick device node.
pub struct JsDevice {
    path: PathBuf,
}

impl JsDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DeviceOpener for JsDevice {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(file))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Watchdog settings.
#[derive(Clone, Debug)]
pub struct WatchdogSettings {
    /// Delay between failed open attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        Self {
            retry_delay_ms: 1000,
        }
    }
}

/// Owns the opener and applies the retry policies.
pub struct DeviceWatchdog {
    opener: Box<dyn DeviceOpener>,
    settings: WatchdogSettings,
}

impl DeviceWatchdog {
    pub fn new(opener: Box<dyn DeviceOpener>, settings: WatchdogSettings) -> Self {
        Self { opener, settings }
    }

    /// Blocks until the device opens, sleeping the configured delay between
    /// attempts. Never returns failure.
    pub fn open_blocking(&self) -> Box<dyn Read + Send> {
        info!("Waiting for joystick device: {}", self.opener.describe());

        loop {
            match self.opener.open() {
                Ok(handle) => {
                    info!("Joystick device opened: {}", self.opener.describe());
                    return handle;
                }
                Err(e) => {
                    warn!(
                        "Failed to open joystick device {}: {}",
                        self.opener.describe(),
                        e
                    );
                    thread::sleep(Duration::from_millis(self.settings.retry_delay_ms));
                }
            }
        }
    }

    /// Single reopen attempt from the read-fault path. Sleeps the retry delay
    /// on failure so a dead device does not spin the event loop.
    pub fn reopen(&self) -> Option<Box<dyn Read + Send>> {
        info!("Reopening joystick device: {}", self.opener.describe());

        match self.opener.open() {
            Ok(handle) => {
                info!("Joystick device reconnected");
                Some(handle)
            }
            Err(e) => {
                warn!("Joystick still unavailable: {}", e);
                thread::sleep(Duration::from_millis(self.settings.retry_delay_ms));
                None
            }
        }
    }
}
