//! Per-address device state

use serde::Serialize;

use super::model::{Model, Quantity};

/// Live values as fractions of full scale.
///
/// Frequency is the only absolute value. Unit scaling happens in
/// [`super::units`], never here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LiveValues {
    /// Voltage per phase; single phase transducers only fill index 0
    pub voltage: [f64; 3],
    /// Current per phase
    pub current: [f64; 3],
    /// Real power
    pub real_power: f64,
    /// Reactive power
    pub reactive_power: f64,
    /// Power factor, absolute
    pub power_factor: f64,
    /// Line frequency in Hz
    pub frequency: f64,
}

impl LiveValues {
    pub(crate) fn set(&mut self, quantity: Quantity, value: f64) {
        match quantity {
            Quantity::Voltage(phase) => self.voltage[phase] = value,
            Quantity::Current(phase) => self.current[phase] = value,
            Quantity::RealPower => self.real_power = value,
            Quantity::ReactivePower => self.reactive_power = value,
            Quantity::PowerFactor => self.power_factor = value,
            Quantity::Frequency => self.frequency = value,
        }
    }
}

/// Energy totalizers, raw as the transducer counts them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EnergyCounters {
    /// Time period from the last energy read, leading decimal digits of
    /// the field. Clearing names the period in hex but does not store it.
    pub time_period: u8,
    /// Active energy counter
    pub kwhr: u32,
    /// Reactive energy counter
    pub kvarhr: u32,
}

/// State kept for one bus address
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DeviceRecord {
    /// Bus address this record belongs to
    pub address: u8,
    /// Model found by the last successful identify
    pub model: Model,
    /// Full-scale voltage, 0 until identified
    pub max_volts: u32,
    /// Full-scale current, 0 until identified
    pub max_amps: u32,
    /// Values from the last successful read
    pub values: LiveValues,
    /// Counters from the last successful energy read
    pub energy: EnergyCounters,
}

impl DeviceRecord {
    /// Empty, unidentified record for `address`
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    /// Whether identify has succeeded for this address
    pub fn is_identified(&self) -> bool {
        self.model.is_identified()
    }
}
