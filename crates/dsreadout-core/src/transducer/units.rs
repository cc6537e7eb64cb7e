//! Unit Conversion Functions
//!
//! Turns the full-scale fractions and raw counters held in a
//! [`DeviceRecord`] into engineering units:
//! - Voltage and current: fraction × full scale
//! - Real/reactive power: fraction × max volts × max amps
//! - Energy: raw counter × max volts × max amps / 3 600 000

use serde::Serialize;

use super::model::Model;
use super::record::DeviceRecord;

/// Counter increments per kWh at unit full scale (1 V × 1 A)
const COUNTS_PER_KWH: f64 = 3_600_000.0;

/// Scale a voltage fraction to volts
pub fn volts(fraction: f64, max_volts: u32) -> f64 {
    fraction * max_volts as f64
}

/// Scale a current fraction to amps
pub fn amps(fraction: f64, max_amps: u32) -> f64 {
    fraction * max_amps as f64
}

/// Scale a power fraction to W (or VAR for reactive power)
pub fn watts(fraction: f64, max_volts: u32, max_amps: u32) -> f64 {
    fraction * max_volts as f64 * max_amps as f64
}

/// Convert a raw energy counter to kWh (or kVARh)
pub fn counter_to_kwh(raw: u32, max_volts: u32, max_amps: u32) -> f64 {
    raw as f64 * max_volts as f64 * max_amps as f64 / COUNTS_PER_KWH
}

/// One phase in volts and amps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseReading {
    /// Volts
    pub voltage: f64,
    /// Amps
    pub current: f64,
}

/// A device record in engineering units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Bus address
    pub address: u8,
    /// Transducer model
    pub model: Model,
    /// Full-scale voltage
    pub max_voltage: u32,
    /// Full-scale current
    pub max_current: u32,
    /// One entry per phase the model measures
    pub phases: Vec<PhaseReading>,
    /// Watts
    pub real_power: f64,
    /// VAR
    pub reactive_power: f64,
    /// Power factor
    pub power_factor: f64,
    /// Hz
    pub frequency: f64,
    /// Active energy in kWh
    pub kwhr: f64,
    /// Reactive energy in kVARh
    pub kvarhr: f64,
}

impl Reading {
    /// Convert an identified record. Returns `None` for an unidentified one,
    /// which has no full scale to convert with.
    pub fn from_record(record: &DeviceRecord) -> Option<Self> {
        if !record.is_identified() {
            return None;
        }
        let (v, a) = (record.max_volts, record.max_amps);
        let values = &record.values;

        let phases = (0..record.model.phases())
            .map(|i| PhaseReading {
                voltage: volts(values.voltage[i], v),
                current: amps(values.current[i], a),
            })
            .collect();

        Some(Self {
            address: record.address,
            model: record.model,
            max_voltage: v,
            max_current: a,
            phases,
            real_power: watts(values.real_power, v, a),
            reactive_power: watts(values.reactive_power, v, a),
            power_factor: values.power_factor,
            frequency: values.frequency,
            kwhr: counter_to_kwh(record.energy.kwhr, v, a),
            kvarhr: counter_to_kwh(record.energy.kvarhr, v, a),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scaling() {
        assert_eq!(volts(0.5, 300), 150.0);
        assert_eq!(amps(0.25, 4), 1.0);
        assert_eq!(watts(0.5, 300, 25), 3750.0);
        assert_eq!(counter_to_kwh(0, 300, 25), 0.0);
        // 480 counts at 300 V / 25 A full scale is exactly 1 kWh
        assert_eq!(counter_to_kwh(480, 300, 25), 1.0);
    }

    #[test]
    fn test_unidentified_has_no_reading() {
        assert!(Reading::from_record(&DeviceRecord::new(7)).is_none());
    }

    #[test]
    fn test_three_phase_reading() {
        let mut record = DeviceRecord::new(9);
        record.model = Model::ThreePhaseFourWire;
        record.max_volts = 300;
        record.max_amps = 5;
        record.values.voltage = [0.5, 0.75, 1.0];
        record.values.current = [0.2, 0.4, 0.6];
        record.values.frequency = 50.0;
        record.energy.kwhr = 2400;

        let reading = Reading::from_record(&record).unwrap();
        assert_eq!(reading.phases.len(), 3);
        assert_eq!(reading.phases[1].voltage, 225.0);
        assert_eq!(reading.phases[2].current, 3.0);
        assert_eq!(reading.frequency, 50.0);
        assert_eq!(reading.kwhr, 1.0);
    }
}
