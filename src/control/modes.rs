//! Control mode registers and the button command table.
//!
//! Three independent registers: emergency stop, gear, steering wheel
//! profile. A register only ever changes on a press edge (value != 0) of a
//! button whose name is bound in [`BUTTON_COMMANDS`]; releases and unbound
//! buttons are recorded but change nothing. Any bound press is accepted
//! unconditionally, there is no transition-legality check.

use std::collections::HashMap;

use tracing::{debug, info};

/// Emergency stop register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    Off = 0x00,
    On = 0x01,
}

/// Gear register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearMode {
    Forward = 0x00,
    Neutral = 0x01,
    Backward = 0x02,
}

/// Steering wheel profile register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelMode {
    Forward = 0x00,
    Fourth = 0x01,
    Backward = 0x02,
}

/// A mode transition carried by one button binding. The variant selects which
/// single register the press replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCommand {
    Stop(StopMode),
    Gear(GearMode),
    Wheel(WheelMode),
}

/// Button name to mode transition bindings.
///
/// The table is many-to-one: several physical buttons may set the same
/// target value (both shoulder pairs drive the stop register, both
/// horizontal d-pad directions select neutral).
pub const BUTTON_COMMANDS: &[(&str, ModeCommand)] = &[
    ("tl", ModeCommand::Stop(StopMode::Off)),
    ("tl2", ModeCommand::Stop(StopMode::On)),
    ("tr", ModeCommand::Stop(StopMode::Off)),
    ("tr2", ModeCommand::Stop(StopMode::On)),
    ("dpad_up", ModeCommand::Gear(GearMode::Forward)),
    ("dpad_down", ModeCommand::Gear(GearMode::Backward)),
    ("dpad_left", ModeCommand::Gear(GearMode::Neutral)),
    ("dpad_right", ModeCommand::Gear(GearMode::Neutral)),
    ("a", ModeCommand::Wheel(WheelMode::Forward)),
    ("c", ModeCommand::Wheel(WheelMode::Backward)),
    ("x", ModeCommand::Wheel(WheelMode::Fourth)),
];

/// Looks a button name up in the binding table.
pub fn command_for(name: &str) -> Option<ModeCommand> {
    BUTTON_COMMANDS
        .iter()
        .find(|(bound, _)| *bound == name)
        .map(|(_, command)| *command)
}

/// The three mode registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlModes {
    pub stop: StopMode,
    pub gear: GearMode,
    pub wheel: WheelMode,
}

impl Default for ControlModes {
    /// Fail-safe startup state: stop engaged, gear neutral, wheel on the
    /// middle profile. The bridge must not come up able to move.
    fn default() -> Self {
        Self {
            stop: StopMode::On,
            gear: GearMode::Neutral,
            wheel: WheelMode::Fourth,
        }
    }
}

impl ControlModes {
    /// Replaces exactly the register the command addresses.
    pub fn apply(&mut self, command: ModeCommand) {
        match command {
            ModeCommand::Stop(mode) => self.stop = mode,
            ModeCommand::Gear(mode) => self.gear = mode,
            ModeCommand::Wheel(mode) => self.wheel = mode,
        }
    }
}

/// Arbitrates button events into mode register changes.
///
/// Also keeps the last observed raw value per button name. The registry is
/// updated on every event whether or not it changes a mode, and is never
/// cleared.
#[derive(Debug, Default)]
pub struct ModeArbiter {
    modes: ControlModes,
    button_states: HashMap<String, i16>,
}

impl ModeArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one button event, already resolved to its name.
    pub fn on_button_event(&mut self, name: &str, value: i16) {
        self.button_states.insert(name.to_string(), value);

        if value == 0 {
            debug!("Button released: {}", name);
            return;
        }

        match command_for(name) {
            Some(command) => {
                info!("Button {} pressed, applying {:?}", name, command);
                self.modes.apply(command);
            }
            None => debug!("Button {} pressed, no mode bound", name),
        }
    }

    pub fn modes(&self) -> ControlModes {
        self.modes
    }

    pub fn button_state(&self, name: &str) -> Option<i16> {
        self.button_states.get(name).copied()
    }
}
