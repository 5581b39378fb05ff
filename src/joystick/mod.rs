//! Joystick input side of the bridge.
//!
//! Decodes raw device records, resolves indices to names, and pumps decoded
//! events into the control state. Device open/reopen policies live in the
//! watchdog; the pump glues everything together on a blocking task.

pub mod event;
pub mod names;
pub mod pump;
pub mod reader;
pub mod watchdog;

pub use event::RawEvent;
pub use names::DeviceMap;
pub use pump::{PumpError, PumpHandle};
pub use reader::{EventSource, ReaderError};
pub use watchdog::{DeviceOpener, DeviceWatchdog, JsDevice, WatchdogSettings};
