//! Index to name resolution for axes and buttons.
//!
//! The kernel reports axes and buttons by plain index; everything downstream
//! (mode table, sampler) works with names. The default map matches the
//! gamepad layout the bridge ships against. Unmapped indices resolve to an
//! `unknown(0xNN)` label that no table entry matches, so they fall through as
//! no-ops.

/// Axis names in device index order.
const DEFAULT_AXES: &[&str] = &[
    "x", "y", "z", "rx", "ry", "rz", "throttle", "rudder", "wheel", "gas", "brake", "hat0x",
    "hat0y",
];

/// Button names in device index order.
const DEFAULT_BUTTONS: &[&str] = &[
    "a", "b", "c", "x", "y", "z", "tl", "tr", "tl2", "tr2", "select", "start", "mode", "thumbl",
    "thumbr", "dpad_up", "dpad_down", "dpad_left", "dpad_right",
];

/// Name lookup tables for one device.
#[derive(Debug, Clone)]
pub struct DeviceMap {
    axes: Vec<String>,
    buttons: Vec<String>,
}

impl DeviceMap {
    /// Map for the supported gamepad layout.
    pub fn default_gamepad() -> Self {
        Self::with_maps(
            DEFAULT_AXES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_BUTTONS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_maps(axes: Vec<String>, buttons: Vec<String>) -> Self {
        Self { axes, buttons }
    }

    /// Resolves an axis index to its name, `unknown(0xNN)` if unmapped.
    pub fn axis_name(&self, index: u8) -> String {
        self.axes
            .get(index as usize)
            .cloned()
            .unwrap_or_else(|| format!("unknown(0x{:02x})", index))
    }

    /// Resolves a button index to its name, `unknown(0xNN)` if unmapped.
    pub fn button_name(&self, index: u8) -> String {
        self.buttons
            .get(index as usize)
            .cloned()
            .unwrap_or_else(|| format!("unknown(0x{:02x})", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_indices() {
        let map = DeviceMap::default_gamepad();
        assert_eq!(map.axis_name(0), "x");
        assert_eq!(map.axis_name(1), "y");
        assert_eq!(map.button_name(0), "a");
        assert_eq!(map.button_name(6), "tl");
    }

    #[test]
    fn unmapped_index_gets_unknown_label() {
        let map = DeviceMap::default_gamepad();
        assert_eq!(map.axis_name(0xab), "unknown(0xab)");
        assert_eq!(map.button_name(0xff), "unknown(0xff)");
    }
}
