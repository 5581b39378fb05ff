//! Fixed-cadence packet transmit loop.
//!
//! One tokio task wakes every tick, samples the latest control snapshot from
//! the watch channel, builds a packet, and hands it to the transport. Sends
//! are fire-and-forget: a transport fault is logged and the loop keeps
//! ticking. The task runs until its cancellation token fires.
//!
//! ```text
//! ControlSnapshot ──watch──► [Transmitter tick] ──► packet::build ──► Transport
//!                                   ▲
//!                              50 ms interval
//! ```

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::control::state::ControlSnapshot;

use super::packet::{self, AliveCounter};
use super::transport::Transport;

/// Transmitter settings.
#[derive(Clone, Debug)]
pub struct TransmitterSettings {
    /// Tick period in milliseconds. 50 ms gives the 20 Hz command cadence
    /// the actuator expects.
    pub tick_interval_ms: u64,
}

impl Default for TransmitterSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
        }
    }
}

/// Transmitter failures.
#[derive(Debug, thiserror::Error)]
pub enum TransmitterError {
    #[error("Transmitter task panicked: {0}")]
    Thread(String),
}

/// Handle for the transmit task.
///
/// Spawns the loop and joins it on shutdown. The loop itself has a single
/// running state; it terminates only through the cancellation token.
pub struct TransmitterHandle {
    task_handle: Option<JoinHandle<()>>,
}

impl TransmitterHandle {
    /// Spawns the transmit loop.
    ///
    /// The task owns the transport; nothing else touches the port while the
    /// bridge runs.
    pub fn spawn(
        transport: Transport,
        snapshot_rx: watch::Receiver<ControlSnapshot>,
        settings: TransmitterSettings,
        token: CancellationToken,
    ) -> Self {
        info!(
            "Spawning transmitter with {} ms tick",
            settings.tick_interval_ms
        );

        let task_handle = tokio::spawn(run_transmit_loop(transport, snapshot_rx, settings, token));

        Self {
            task_handle: Some(task_handle),
        }
    }

    /// Waits for the transmit loop to finish after the token was cancelled.
    pub async fn shutdown(&mut self) -> Result<(), TransmitterError> {
        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(()) => {
                    debug!("Transmitter task completed");
                    Ok(())
                }
                Err(e) => Err(TransmitterError::Thread(e.to_string())),
            }
        } else {
            debug!("Transmitter already shut down");
            Ok(())
        }
    }
}

async fn run_transmit_loop(
    mut transport: Transport,
    snapshot_rx: watch::Receiver<ControlSnapshot>,
    settings: TransmitterSettings,
    token: CancellationToken,
) {
    let mut ticker = interval(Duration::from_millis(settings.tick_interval_ms));
    let mut alive = AliveCounter::default();

    info!("Transmit loop running");

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("Transmit loop shutting down");
                break;
            }

            _ = ticker.tick() => {
                let counter = alive.tick();
                let snapshot = *snapshot_rx.borrow();
                let packet = packet::build(counter, snapshot.modes, snapshot.sample);
                debug!("Tick {}: {:?}", counter, packet);

                // Fire-and-forget: a dropped packet must not stall the
                // cadence.
                if let Err(e) = transport.send(&packet) {
                    warn!("Packet dropped: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::modes::StopMode;
    use crate::link::transport::{PortOpener, TransportError, TransportSettings};
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    struct SinkWriter {
        written: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl Write for SinkWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.lock().unwrap().push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct SinkOpener {
        written: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl PortOpener for SinkOpener {
        fn open(&self) -> Result<Box<dyn Write + Send>, TransportError> {
            Ok(Box::new(SinkWriter {
                written: self.written.clone(),
            }))
        }

        fn describe(&self) -> String {
            "sink port".to_string()
        }
    }

    #[tokio::test]
    async fn ticks_send_packets_with_increasing_counter() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let transport = Transport::connect(
            Box::new(SinkOpener {
                written: written.clone(),
            }),
            TransportSettings::default(),
        );

        let (_snapshot_tx, snapshot_rx) = watch::channel(ControlSnapshot::default());
        let token = CancellationToken::new();
        let mut handle = TransmitterHandle::spawn(
            transport,
            snapshot_rx,
            TransmitterSettings {
                tick_interval_ms: 5,
            },
            token.clone(),
        );

        tokio::time::sleep(Duration::from_millis(40)).await;
        token.cancel();
        handle.shutdown().await.unwrap();

        let written = written.lock().unwrap();
        assert!(written.len() >= 2);
        // Alive counter starts at 1 and increments per tick.
        assert_eq!(written[0][0], 1);
        assert_eq!(written[1][0], 2);
        // Fail-safe snapshot bytes until the pump publishes something else.
        assert_eq!(written[0][1], StopMode::On as u8);
    }

    #[tokio::test]
    async fn tick_samples_the_latest_snapshot() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let transport = Transport::connect(
            Box::new(SinkOpener {
                written: written.clone(),
            }),
            TransportSettings::default(),
        );

        let (snapshot_tx, snapshot_rx) = watch::channel(ControlSnapshot::default());
        let token = CancellationToken::new();
        let mut handle = TransmitterHandle::spawn(
            transport,
            snapshot_rx,
            TransmitterSettings {
                tick_interval_ms: 5,
            },
            token.clone(),
        );

        // Publish two snapshots between ticks; only the latest matters.
        let mut snapshot = ControlSnapshot::default();
        snapshot.sample.speed = 100i16.to_le_bytes();
        snapshot_tx.send(snapshot).unwrap();
        snapshot.sample.speed = 200i16.to_le_bytes();
        snapshot_tx.send(snapshot).unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        token.cancel();
        handle.shutdown().await.unwrap();

        let written = written.lock().unwrap();
        let last = written.last().unwrap();
        assert_eq!(&last[4..6], &200i16.to_le_bytes());
    }
}
