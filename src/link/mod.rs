//! Outbound link: packet encoding, serial transport, transmit loop.

pub mod packet;
pub mod transmitter;
pub mod transport;

pub use packet::{AliveCounter, CommandPacket};
pub use transmitter::{TransmitterHandle, TransmitterSettings};
pub use transport::{PortOpener, SerialOpener, Transport, TransportError, TransportSettings};
