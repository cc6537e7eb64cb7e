//! Serial Protocol Communication
//!
//! Implements the ASCII command/response protocol spoken by Datastream
//! transducers on an RS-485 bus.
//!
//! The bus is half-duplex: one command goes out, one transducer answers,
//! and only then may the next command be written.

pub mod commands;
mod error;
pub mod fields;
pub mod serial;
pub mod stream;
pub mod transport;

pub use commands::Command;
pub use error::ProtocolError;
pub use serial::{clear_buffers, list_ports, open_port, PortInfo};
pub use stream::{ByteChannel, SerialChannel};
pub use transport::LineTransport;

/// Default baud rate of Datastream transducers
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default wait per readiness poll in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Number of addressable transducers on one bus
pub const ADDRESS_COUNT: usize = 256;
