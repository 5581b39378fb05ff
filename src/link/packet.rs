//! Command packet encoding.
//!
//! Wire layout, one packet per transmit tick:
//!
//! ```text
//! ┌───────┬──────┬──────┬───────┬──────────┬──────────┐
//! │ alive │ stop │ gear │ wheel │ speed LE │ steer LE │
//! │  u8   │  u8  │  u8  │  u8   │ i16 (2B) │ i16 (2B) │
//! └───────┴──────┴──────┴───────┴──────────┴──────────┘
//! ```
//!
//! No length prefix, terminator, or checksum; if the link ever grows framing
//! it belongs here, behind [`build`].

use crate::control::modes::ControlModes;
use crate::control::sampler::AxisSample;

/// Packet length on the wire.
pub const PACKET_LEN: usize = 8;

/// One encoded command packet. Transient, built per tick and dropped after
/// the send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPacket {
    bytes: [u8; PACKET_LEN],
}

impl CommandPacket {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Builds a packet from the counter and a control snapshot.
///
/// Pure function of its inputs: identical arguments produce byte-identical
/// packets, so the encoding is testable without any device or port.
pub fn build(counter: u8, modes: ControlModes, sample: AxisSample) -> CommandPacket {
    CommandPacket {
        bytes: [
            counter,
            modes.stop as u8,
            modes.gear as u8,
            modes.wheel as u8,
            sample.speed[0],
            sample.speed[1],
            sample.steer[0],
            sample.steer[1],
        ],
    }
}

/// Wrapping sequence number included in each packet so the receiver can
/// detect link liveness.
#[derive(Debug, Clone, Copy, Default)]
pub struct AliveCounter(u8);

impl AliveCounter {
    /// Increments the counter, wrapping modulo 256, and returns the new
    /// value. Called once per transmit tick.
    pub fn tick(&mut self) -> u8 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::modes::{GearMode, StopMode, WheelMode};

    #[test]
    fn encodes_modes_and_axis_bytes_in_order() {
        let modes = ControlModes {
            stop: StopMode::Off,
            gear: GearMode::Backward,
            wheel: WheelMode::Fourth,
        };
        let sample = AxisSample {
            speed: (-1000i16).to_le_bytes(),
            steer: 512i16.to_le_bytes(),
        };

        let packet = build(42, modes, sample);
        assert_eq!(
            packet.as_bytes(),
            &[42, 0x00, 0x02, 0x01, 0x18, 0xFC, 0x00, 0x02]
        );
    }

    #[test]
    fn build_is_pure() {
        let modes = ControlModes::default();
        let sample = AxisSample::default();
        assert_eq!(build(7, modes, sample), build(7, modes, sample));
    }

    #[test]
    fn default_state_encodes_fail_safe_bytes() {
        let packet = build(1, ControlModes::default(), AxisSample::default());
        // Stop engaged, gear neutral, wheel fourth, both axes centered.
        assert_eq!(packet.as_bytes(), &[1, 0x01, 0x01, 0x01, 0, 0, 0, 0]);
    }

    #[test]
    fn alive_counter_wraps_after_256_ticks() {
        let mut counter = AliveCounter::default();
        let start = counter.value();
        for _ in 0..256 {
            counter.tick();
        }
        assert_eq!(counter.value(), start);
    }

    #[test]
    fn alive_counter_increments_per_tick() {
        let mut counter = AliveCounter::default();
        assert_eq!(counter.tick(), 1);
        assert_eq!(counter.tick(), 2);
        assert_eq!(counter.value(), 2);
    }
}
