//! Transducer models and their response layouts

use serde::{Deserialize, Serialize};

/// Transducer model as reported by the identify command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Model {
    /// Not identified yet
    #[default]
    Unidentified,
    /// CRD5110: single phase
    SinglePhase,
    /// CRD5170: three phase, four wire
    ThreePhaseFourWire,
}

/// One entry of the known model table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Model name exactly as the transducer reports it
    pub name: &'static str,
    /// Value layout family
    pub model: Model,
    /// Full-scale voltage
    pub max_volts: u32,
    /// Full-scale current
    pub max_amps: u32,
}

/// Every model this tool knows how to read
pub const KNOWN_MODELS: &[ModelSpec] = &[
    ModelSpec {
        name: "CRD5110-300-25",
        model: Model::SinglePhase,
        max_volts: 300,
        max_amps: 25,
    },
    ModelSpec {
        name: "CRD5170-300-5",
        model: Model::ThreePhaseFourWire,
        max_volts: 300,
        max_amps: 5,
    },
];

/// Look up a model name. The match is exact, byte for byte.
pub fn lookup(name: &[u8]) -> Option<&'static ModelSpec> {
    KNOWN_MODELS.iter().find(|spec| spec.name.as_bytes() == name)
}

/// A value reported by the live values command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Voltage fraction of phase 0..=2
    Voltage(usize),
    /// Current fraction of phase 0..=2
    Current(usize),
    /// Real power fraction
    RealPower,
    /// Reactive power fraction
    ReactivePower,
    /// Power factor, -1..=1
    PowerFactor,
    /// Absolute, in Hz
    Frequency,
}

/// Position of one value in the live values response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// What the field holds
    pub quantity: Quantity,
    /// First character of the field
    pub offset: usize,
    /// Field width in characters
    pub width: usize,
}

const fn at(quantity: Quantity, offset: usize, width: usize) -> FieldSpec {
    FieldSpec {
        quantity,
        offset,
        width,
    }
}

const SINGLE_PHASE_LAYOUT: &[FieldSpec] = &[
    at(Quantity::Voltage(0), 1, 7),
    at(Quantity::Current(0), 8, 7),
    at(Quantity::RealPower, 15, 7),
    at(Quantity::ReactivePower, 22, 7),
    at(Quantity::PowerFactor, 29, 7),
    at(Quantity::Frequency, 36, 6),
];

const THREE_PHASE_FOUR_WIRE_LAYOUT: &[FieldSpec] = &[
    at(Quantity::Voltage(0), 1, 7),
    at(Quantity::Current(0), 8, 7),
    at(Quantity::Voltage(1), 15, 7),
    at(Quantity::Current(1), 22, 7),
    at(Quantity::Voltage(2), 29, 7),
    at(Quantity::Current(2), 36, 7),
    at(Quantity::RealPower, 43, 7),
    at(Quantity::ReactivePower, 50, 7),
    at(Quantity::PowerFactor, 57, 7),
    at(Quantity::Frequency, 64, 6),
];

impl Model {
    /// Anything but [`Model::Unidentified`]
    pub fn is_identified(&self) -> bool {
        !matches!(self, Model::Unidentified)
    }

    /// Number of measured phases
    pub fn phases(&self) -> usize {
        match self {
            Model::Unidentified => 0,
            Model::SinglePhase => 1,
            Model::ThreePhaseFourWire => 3,
        }
    }

    /// Field layout of the live values response
    pub fn value_layout(&self) -> &'static [FieldSpec] {
        match self {
            Model::Unidentified => &[],
            Model::SinglePhase => SINGLE_PHASE_LAYOUT,
            Model::ThreePhaseFourWire => THREE_PHASE_FOUR_WIRE_LAYOUT,
        }
    }

    /// Minimum length of a live values response for this model
    pub fn value_line_len(&self) -> usize {
        self.value_layout()
            .iter()
            .map(|f| f.offset + f.width)
            .max()
            .unwrap_or(0)
    }
}
