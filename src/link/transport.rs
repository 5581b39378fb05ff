//! Serial transport with a single-reopen failure policy.
//!
//! A failed write triggers exactly one reopen attempt so the next tick gets a
//! fresh port; the failed packet itself is dropped, never re-sent. The error
//! is still reported upward so a persistently dead link shows up in the logs
//! instead of being swallowed.

use std::io::Write;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use super::packet::CommandPacket;

/// Transport failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Writing the packet to the open port failed.
    #[error("Serial write failed: {0}")]
    Write(String),

    /// Opening or reopening the port failed.
    #[error("Serial open failed: {0}")]
    Open(String),

    /// No open port was available for this send.
    #[error("Serial port not open: {0}")]
    NotOpen(String),
}

/// Opens the outbound port. Boxed behind a trait so the reopen policy can be
/// exercised without hardware.
pub trait PortOpener: Send {
    fn open(&self) -> Result<Box<dyn Write + Send>, TransportError>;

    /// Human-readable identity of the port, used in log output.
    fn describe(&self) -> String;
}

/// Opener for the real serial port, fixed name and baud rate.
pub struct SerialOpener {
    path: String,
    baud_rate: u32,
}

impl SerialOpener {
    pub fn new(path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            path: path.into(),
            baud_rate,
        }
    }
}

impl PortOpener for SerialOpener {
    fn open(&self) -> Result<Box<dyn Write + Send>, TransportError> {
        let port = serialport::new(&self.path, self.baud_rate)
            .open()
            .map_err(|e| TransportError::Open(e.to_string()))?;
        Ok(Box::new(port))
    }

    fn describe(&self) -> String {
        format!("{} @ {} baud", self.path, self.baud_rate)
    }
}

/// Transport settings.
#[derive(Clone, Debug)]
pub struct TransportSettings {
    /// Backoff after a failed reopen in milliseconds.
    pub reopen_delay_ms: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            reopen_delay_ms: 1000,
        }
    }
}

/// Owns the port handle and applies the failure policy.
pub struct Transport {
    opener: Box<dyn PortOpener>,
    port: Option<Box<dyn Write + Send>>,
    settings: TransportSettings,
}

impl Transport {
    /// Attempts the initial open. A failure is logged, not fatal; the first
    /// send will go through the reopen path.
    pub fn connect(opener: Box<dyn PortOpener>, settings: TransportSettings) -> Self {
        let port = match opener.open() {
            Ok(port) => {
                info!("Serial port opened: {}", opener.describe());
                Some(port)
            }
            Err(e) => {
                warn!("Serial port unavailable at startup: {}", e);
                None
            }
        };

        Self {
            opener,
            port,
            settings,
        }
    }

    /// Writes one packet to the port.
    ///
    /// On failure the port is reopened once for the next call and the error
    /// is returned; this packet is not retried.
    pub fn send(&mut self, packet: &CommandPacket) -> Result<(), TransportError> {
        let port = match self.port.as_mut() {
            Some(port) => port,
            None => {
                self.reopen();
                return Err(TransportError::NotOpen(self.opener.describe()));
            }
        };

        match port.write_all(packet.as_bytes()).and_then(|_| port.flush()) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Serial write failed: {}", e);
                self.reopen();
                Err(TransportError::Write(e.to_string()))
            }
        }
    }

    /// Single reopen attempt, with a backoff sleep when it fails so a dead
    /// link does not burn every following tick.
    fn reopen(&mut self) {
        match self.opener.open() {
            Ok(port) => {
                info!("Serial port reopened: {}", self.opener.describe());
                self.port = Some(port);
            }
            Err(e) => {
                warn!("Serial reopen failed: {}", e);
                self.port = None;
                thread::sleep(Duration::from_millis(self.settings.reopen_delay_ms));
            }
        }
    }
}
