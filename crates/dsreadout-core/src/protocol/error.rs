//! Protocol errors

use thiserror::Error;

/// Errors that can occur while talking to transducers on the bus
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The port could not be opened or configured
    #[error("Serial port error: {0}")]
    SerialError(String),

    /// No response arrived within the poll interval
    #[error("Timed out waiting for transducer response")]
    Timeout,

    /// The channel reported end of file
    #[error("Serial channel closed")]
    ChannelClosed,

    /// Nothing answered the model query, or with an unknown name
    #[error("Unknown transducer model")]
    UnknownModel,

    /// The address must be identified before this operation
    #[error("Transducer {0:#04x} has not been identified")]
    NotIdentified(u8),

    /// Missing, short or malformed response to a read
    #[error("Unable to read transducer: {0}")]
    ReadError(String),

    /// Energy response checksum did not add up
    #[error("Checksum mismatch: computed {expected:#04x}, device sent {actual:#04x}")]
    ChecksumMismatch {
        /// Sum over the received bytes
        expected: u8,
        /// Checksum field sent by the transducer
        actual: u8,
    },

    /// Clearing the energy totalizers was not confirmed
    #[error("Unable to clear transducer energy values")]
    ClearError,

    /// Factory reset was not answered with `0x01 0x06`
    #[error("Transducer did not acknowledge factory reset")]
    ResetError,

    /// The new address was not echoed back
    #[error("Transducer did not acknowledge new address {0:#04x}")]
    SetAddressError(u8),

    /// Configuration could not be loaded or is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Underlying read, write or file error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
