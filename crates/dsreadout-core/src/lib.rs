//! # dsreadout Core Library
//!
//! Protocol engine for Datastream power-metering transducers.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Byte-exact, timeout-bounded line framing over a serial channel
//! - Command encoding for the transducer ASCII protocol
//! - Identification, live value and energy readout with checksum validation
//! - Energy clearing, factory reset and address assignment
//! - Conversion of device fractions and counters into engineering units
//!
//! ## Supported transducers
//!
//! - CRD5110-300-25 (single phase)
//! - CRD5170-300-5 (three phase, four wire)
//!
//! ## Example
//!
//! ```rust,ignore
//! use dsreadout_core::prelude::*;
//!
//! let port = open_port("/dev/ttyUSB0", None)?;
//! let mut bus = Transducer::new(SerialChannel::new(port), EngineConfig::default());
//!
//! bus.identify(5)?;
//! bus.read(5)?;
//! bus.read_energy(5)?;
//! let reading = Reading::from_record(bus.record(5));
//! ```

pub mod protocol;
pub mod transducer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::protocol::{open_port, ByteChannel, ProtocolError, SerialChannel};
    pub use crate::transducer::{
        Confirmed, DeviceRecord, EngineConfig, Model, Reading, Transducer,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
