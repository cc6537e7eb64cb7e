//! Human-readable and JSON output

use std::fmt::Write;

use dsreadout_core::transducer::{DeviceRecord, Reading};

/// Full-scale values of an identified transducer
pub fn identity(record: &DeviceRecord, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&serde_json::json!({
            "address": record.address,
            "model": record.model,
            "max_voltage": record.max_volts,
            "max_current": record.max_amps,
        }))?);
    }
    Ok(format!(
        "max_voltage: {}\nmax_current: {}\n",
        record.max_volts, record.max_amps
    ))
}

/// Live values and energy totals in engineering units
pub fn reading(reading: &Reading, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(reading)?);
    }

    let mut out = String::new();
    writeln!(out, "max_voltage: {}", reading.max_voltage)?;
    writeln!(out, "max_current: {}", reading.max_current)?;
    if let [phase] = reading.phases.as_slice() {
        writeln!(out, "voltage: {:.6}", phase.voltage)?;
        writeln!(out, "current: {:.6}", phase.current)?;
    } else {
        for (i, phase) in reading.phases.iter().enumerate() {
            writeln!(out, "voltage{}: {:.6}", i + 1, phase.voltage)?;
            writeln!(out, "current{}: {:.6}", i + 1, phase.current)?;
        }
    }
    writeln!(out, "real_power: {:.6}", reading.real_power)?;
    writeln!(out, "reactive_power: {:.6}", reading.reactive_power)?;
    writeln!(out, "power_factor: {:.6}", reading.power_factor)?;
    writeln!(out, "frequency: {:.6}", reading.frequency)?;
    writeln!(out, "kwhr: {:.6}", reading.kwhr)?;
    writeln!(out, "kvarhr: {:.6}", reading.kvarhr)?;
    Ok(out)
}

/// Scan result: one line per transducer found, then the count
pub fn scan<'a>(
    found: impl Iterator<Item = &'a DeviceRecord>,
    count: usize,
    json: bool,
) -> anyhow::Result<String> {
    if json {
        let devices: Vec<_> = found
            .map(|r| {
                serde_json::json!({
                    "address": r.address,
                    "model": r.model,
                    "max_voltage": r.max_volts,
                    "max_current": r.max_amps,
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&devices)?);
    }

    let mut out = String::new();
    for r in found {
        writeln!(out, "{}: {} V, {} A", r.address, r.max_volts, r.max_amps)?;
    }
    writeln!(out, "{} transducers found.", count)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsreadout_core::transducer::Model;
    use pretty_assertions::assert_eq;

    fn single_phase() -> DeviceRecord {
        let mut record = DeviceRecord::new(5);
        record.model = Model::SinglePhase;
        record.max_volts = 300;
        record.max_amps = 25;
        record.values.voltage[0] = 0.5;
        record.values.current[0] = 0.4;
        record.values.frequency = 50.0;
        record.energy.kwhr = 480;
        record
    }

    #[test]
    fn test_single_phase_text() {
        let text = reading(&Reading::from_record(&single_phase()).unwrap(), false).unwrap();
        assert_eq!(
            text,
            "max_voltage: 300\n\
             max_current: 25\n\
             voltage: 150.000000\n\
             current: 10.000000\n\
             real_power: 0.000000\n\
             reactive_power: 0.000000\n\
             power_factor: 0.000000\n\
             frequency: 50.000000\n\
             kwhr: 1.000000\n\
             kvarhr: 0.000000\n"
        );
    }

    #[test]
    fn test_three_phase_text_numbers_phases() {
        let mut record = single_phase();
        record.model = Model::ThreePhaseFourWire;
        record.max_amps = 5;
        let text = reading(&Reading::from_record(&record).unwrap(), false).unwrap();
        assert!(text.contains("voltage1: 150.000000\n"));
        assert!(text.contains("current3: 0.000000\n"));
        assert!(!text.contains("\nvoltage: "));
    }

    #[test]
    fn test_reading_json() {
        let text = reading(&Reading::from_record(&single_phase()).unwrap(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["model"], "SinglePhase");
        assert_eq!(value["phases"][0]["voltage"], 150.0);
    }

    #[test]
    fn test_scan_text() {
        let records = [single_phase()];
        let text = scan(records.iter(), 1, false).unwrap();
        assert_eq!(text, "5: 300 V, 25 A\n1 transducers found.\n");
    }

    #[test]
    fn test_identity_text() {
        assert_eq!(
            identity(&single_phase(), false).unwrap(),
            "max_voltage: 300\nmax_current: 25\n"
        );
    }
}
