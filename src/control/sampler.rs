//! Sampled-hold capture of the speed and steer axes.
//!
//! The packet carries raw signed 16-bit magnitudes, so values are stored
//! as-is and pre-encoded little-endian. No normalization to a unit range.

use std::collections::HashMap;

use tracing::debug;

/// Name of the axis driving the speed channel.
const SPEED_AXIS: &str = "x";

/// Name of the axis driving the steer channel.
const STEER_AXIS: &str = "y";

/// Latest speed/steer values as little-endian signed 16-bit byte pairs.
///
/// Overwritten in place per event; a stale value persists until the next
/// event on its channel. Intermediate values between transmit ticks are
/// not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSample {
    pub speed: [u8; 2],
    pub steer: [u8; 2],
}

/// Routes axis events into the sample and keeps the per-axis raw value
/// registry. Only the speed and steer axes feed the sample; every axis event
/// still lands in the registry.
#[derive(Debug, Default)]
pub struct AxisSampler {
    sample: AxisSample,
    axis_states: HashMap<String, i16>,
}

impl AxisSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one axis event, already resolved to its name.
    pub fn on_axis_event(&mut self, name: &str, value: i16) {
        self.axis_states.insert(name.to_string(), value);

        match name {
            SPEED_AXIS => {
                self.sample.speed = value.to_le_bytes();
                debug!("Speed axis: {}", value);
            }
            STEER_AXIS => {
                self.sample.steer = value.to_le_bytes();
                debug!("Steer axis: {}", value);
            }
            _ => debug!("Ignoring axis {}: {}", name, value),
        }
    }

    pub fn sample(&self) -> AxisSample {
        self.sample
    }

    pub fn axis_state(&self, name: &str) -> Option<i16> {
        self.axis_states.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_event_encodes_little_endian() {
        let mut sampler = AxisSampler::new();
        sampler.on_axis_event("x", -1000);
        assert_eq!(sampler.sample().speed, [0x18, 0xFC]);
        // Steer channel untouched.
        assert_eq!(sampler.sample().steer, [0x00, 0x00]);
    }

    #[test]
    fn steer_event_leaves_speed_alone() {
        let mut sampler = AxisSampler::new();
        sampler.on_axis_event("x", 300);
        sampler.on_axis_event("y", -300);
        assert_eq!(sampler.sample().speed, 300i16.to_le_bytes());
        assert_eq!(sampler.sample().steer, (-300i16).to_le_bytes());
    }

    #[test]
    fn latest_value_overwrites_in_place() {
        let mut sampler = AxisSampler::new();
        sampler.on_axis_event("y", 100);
        sampler.on_axis_event("y", 200);
        assert_eq!(sampler.sample().steer, 200i16.to_le_bytes());
    }

    #[test]
    fn other_axes_only_update_the_registry() {
        let mut sampler = AxisSampler::new();
        sampler.on_axis_event("rz", 9999);
        sampler.on_axis_event("unknown(0x0b)", -5);

        assert_eq!(sampler.sample(), AxisSample::default());
        assert_eq!(sampler.axis_state("rz"), Some(9999));
        assert_eq!(sampler.axis_state("unknown(0x0b)"), Some(-5));
    }
}
