//! Transducer protocol engine and device registry

mod config;
mod engine;
pub mod model;
mod record;
pub mod units;

pub use config::EngineConfig;
pub use engine::{parse_energy, Confirmed, Transducer};
pub use model::{Model, ModelSpec, KNOWN_MODELS};
pub use record::{DeviceRecord, EnergyCounters, LiveValues};
pub use units::Reading;
