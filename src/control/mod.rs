//! Control state shared between the event and transmit flows.

pub mod modes;
pub mod sampler;
pub mod state;

pub use modes::{ControlModes, GearMode, ModeArbiter, ModeCommand, StopMode, WheelMode};
pub use sampler::{AxisSample, AxisSampler};
pub use state::{ControlSnapshot, ControlState};
