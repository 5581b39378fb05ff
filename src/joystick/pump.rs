//! Event pump: the blocking event-consuming flow.
//!
//! Built as a statum state machine with two states:
//!
//! ```text
//! Opening ──► Pumping
//! (blocking     (read, apply, publish, reopen on fault)
//!  device open)
//! ```
//!
//! The pump is the single writer of control state. After every applied event
//! it publishes a fresh snapshot through a watch channel; the transmit flow
//! only ever reads those immutable snapshots, so a tick can never observe a
//! half-updated value. Snapshots published between two ticks overwrite each
//! other and only the latest is sent (sampled-hold, not an event log).

use statum::{machine, state};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::control::state::{ControlSnapshot, ControlState};

use super::reader::{EventSource, ReaderError};
use super::watchdog::DeviceWatchdog;

/// Pump failures.
#[derive(Debug, thiserror::Error)]
pub enum PumpError {
    /// The snapshot channel lost all consumers.
    #[error("Snapshot channel closed: {0}")]
    ChannelClosed(String),

    /// Internal state error.
    #[error("Pump state error: {0}")]
    StateError(String),
}

/// Pump lifecycle states.
#[state]
#[derive(Debug, Clone)]
pub enum PumpState {
    Opening,
    Pumping,
}

/// The event pump machine.
#[machine]
pub struct EventPump<S: PumpState> {
    // Device open/reopen policies
    watchdog: DeviceWatchdog,

    // Decoding event source, present once the device is open
    source: Option<EventSource>,

    // Control state this pump exclusively writes
    control: ControlState,

    // Latest-value channel to the transmit flow
    snapshot_tx: watch::Sender<ControlSnapshot>,

    // Cooperative shutdown signal, checked between reads
    token: CancellationToken,
}

impl EventPump<Opening> {
    pub fn create(
        watchdog: DeviceWatchdog,
        control: ControlState,
        snapshot_tx: watch::Sender<ControlSnapshot>,
        token: CancellationToken,
    ) -> Self {
        debug!("Creating event pump");
        Self::new(watchdog, None, control, snapshot_tx, token)
    }

    /// Blocks until the device opens, then transitions to Pumping.
    pub fn open(mut self) -> EventPump<Pumping> {
        let handle = self.watchdog.open_blocking();
        self.source = Some(EventSource::new(handle));

        info!("Event pump ready, transitioning to Pumping");
        self.transition()
    }
}

impl EventPump<Pumping> {
    /// Main event loop.
    ///
    /// Blocks on device reads. A read fault gets a single reopen attempt and
    /// the loop resumes either way; only cancellation or a closed snapshot
    /// channel end it.
    pub fn run(mut self) -> Result<(), PumpError> {
        info!("Event pump running");

        let source = match self.source.as_mut() {
            Some(source) => source,
            None => {
                return Err(PumpError::StateError(
                    "Pumping state entered without an open device".to_string(),
                ))
            }
        };

        loop {
            if self.token.is_cancelled() {
                info!("Event pump shutting down");
                return Ok(());
            }

            match source.next_event() {
                Ok(event) => {
                    debug!(
                        "Device event at {}: flags 0x{:02x} index {} value {}",
                        event.received.format("%H:%M:%S.%3f"),
                        event.flags,
                        event.index,
                        event.value
                    );

                    self.control.handle_event(&event);

                    if self.snapshot_tx.send(self.control.snapshot()).is_err() {
                        info!("No snapshot consumers left, stopping event pump");
                        return Err(PumpError::ChannelClosed(
                            "all snapshot receivers dropped".to_string(),
                        ));
                    }
                }
                Err(ReaderError::DeviceLost(reason)) => {
                    warn!("Joystick read fault: {}", reason);

                    // Single attempt; on failure the next loop iteration
                    // fails fast and lands here again after the backoff.
                    if let Some(handle) = self.watchdog.reopen() {
                        source.replace_handle(handle);
                    }
                }
            }
        }
    }
}

/// Handle for the pump running on a blocking task.
pub struct PumpHandle {
    task_handle: Option<JoinHandle<Result<(), PumpError>>>,
}

impl PumpHandle {
    /// Spawns the pump on the blocking pool: device reads park the thread
    /// until the driver produces a record.
    pub fn spawn(
        watchdog: DeviceWatchdog,
        control: ControlState,
        snapshot_tx: watch::Sender<ControlSnapshot>,
        token: CancellationToken,
    ) -> Self {
        info!("Spawning event pump");

        let task_handle = tokio::task::spawn_blocking(move || {
            let pump = EventPump::create(watchdog, control, snapshot_tx, token);
            let result = pump.open().run();
            if let Err(ref e) = result {
                warn!("Event pump terminated: {}", e);
            }
            result
        });

        Self {
            task_handle: Some(task_handle),
        }
    }

    /// Waits for the pump to finish.
    ///
    /// Only meaningful once the token is cancelled AND the current read has
    /// returned; a pump parked inside a device read ends with the process.
    pub async fn join(&mut self) -> Result<(), PumpError> {
        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(PumpError::StateError(format!("pump task panicked: {}", e))),
            }
        } else {
            Ok(())
        }
    }
}
