//! Control state owned by the event-consuming flow.
//!
//! Single-writer: only the event pump mutates this state. Readers never touch
//! it directly; after every applied event the pump publishes an immutable
//! [`ControlSnapshot`] over a watch channel, which gives the transmit flow
//! torn-free latest-value sampling.

use tracing::debug;

use crate::joystick::event::RawEvent;
use crate::joystick::names::DeviceMap;

use super::modes::{ControlModes, ModeArbiter};
use super::sampler::{AxisSample, AxisSampler};

/// The slice of control state a transmit tick needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlSnapshot {
    pub modes: ControlModes,
    pub sample: AxisSample,
}

/// Aggregate of arbiter, sampler, and the name map used to route events.
pub struct ControlState {
    map: DeviceMap,
    arbiter: ModeArbiter,
    sampler: AxisSampler,
}

impl ControlState {
    pub fn new(map: DeviceMap) -> Self {
        Self {
            map,
            arbiter: ModeArbiter::new(),
            sampler: AxisSampler::new(),
        }
    }

    /// Applies one decoded record. The flag bits are independent, so a single
    /// record may feed both the arbiter and the sampler.
    pub fn handle_event(&mut self, event: &RawEvent) {
        if event.is_init() {
            debug!(
                "Initial-state record at {}: flags 0x{:02x} index {}",
                event.received.format("%H:%M:%S.%3f"),
                event.flags,
                event.index
            );
        }

        if event.is_button() {
            let name = self.map.button_name(event.index);
            self.arbiter.on_button_event(&name, event.value);
        }

        if event.is_axis() {
            let name = self.map.axis_name(event.index);
            self.sampler.on_axis_event(&name, event.value);
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            modes: self.arbiter.modes(),
            sample: self.sampler.sample(),
        }
    }
}
