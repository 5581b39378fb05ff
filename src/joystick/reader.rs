//! Blocking event source over an open device handle.

use std::io::Read;

use tracing::trace;

use super::event::{RawEvent, EVENT_SIZE};

/// Errors reported by the event source.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The device handle stopped producing records (unplugged, closed, or a
    /// driver fault). Recovery is the watchdog's job, not the reader's.
    #[error("Joystick device lost: {0}")]
    DeviceLost(String),
}

/// Reads fixed-size records from an open device handle and decodes them.
///
/// `next_event` blocks until a full record arrives. The source never retries
/// on its own; a failed read surfaces as [`ReaderError::DeviceLost`] and the
/// caller decides whether to reopen.
pub struct EventSource {
    handle: Box<dyn Read + Send>,
}

impl EventSource {
    pub fn new(handle: Box<dyn Read + Send>) -> Self {
        Self { handle }
    }

    /// Blocks until the device produces one record, then decodes it.
    pub fn next_event(&mut self) -> Result<RawEvent, ReaderError> {
        let mut buf = [0u8; EVENT_SIZE];
        self.handle
            .read_exact(&mut buf)
            .map_err(|e| ReaderError::DeviceLost(e.to_string()))?;

        let event = RawEvent::parse(&buf);
        trace!("Decoded device record: {:?}", event);
        Ok(event)
    }

    /// Swaps in a fresh handle after a reopen.
    pub fn replace_handle(&mut self, handle: Box<dyn Read + Send>) {
        self.handle = handle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joystick::event::{FLAG_AXIS, FLAG_BUTTON};
    use std::io::Cursor;

    fn record(value: i16, flags: u8, index: u8) -> Vec<u8> {
        let mut buf = vec![0u8; EVENT_SIZE];
        buf[4..6].copy_from_slice(&value.to_le_bytes());
        buf[6] = flags;
        buf[7] = index;
        buf
    }

    #[test]
    fn reads_consecutive_records() {
        let mut bytes = record(1, FLAG_BUTTON, 6);
        bytes.extend(record(-512, FLAG_AXIS, 0));
        let mut source = EventSource::new(Box::new(Cursor::new(bytes)));

        let first = source.next_event().unwrap();
        assert!(first.is_button());
        assert_eq!(first.index, 6);

        let second = source.next_event().unwrap();
        assert!(second.is_axis());
        assert_eq!(second.value, -512);
    }

    #[test]
    fn exhausted_handle_reports_device_lost() {
        let mut source = EventSource::new(Box::new(Cursor::new(vec![0u8; 3])));
        let err = source.next_event().unwrap_err();
        assert!(matches!(err, ReaderError::DeviceLost(_)));
    }

    #[test]
    fn replace_handle_resumes_reading() {
        let mut source = EventSource::new(Box::new(Cursor::new(Vec::new())));
        assert!(source.next_event().is_err());

        source.replace_handle(Box::new(Cursor::new(record(1, FLAG_BUTTON, 0))));
        assert!(source.next_event().is_ok());
    }
}
