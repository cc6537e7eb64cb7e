//! Transducer protocol engine
//!
//! Owns the bus and a 256-entry registry of [`DeviceRecord`]s, one per
//! address. Every operation writes one command, consumes the complete
//! response (or gives up on a timeout) and only then returns, so exchanges
//! on the half-duplex bus never overlap.

use crate::protocol::{
    commands::{self, Command, RESET_ACK},
    fields, ByteChannel, LineTransport, ProtocolError, ADDRESS_COUNT,
};

use super::config::EngineConfig;
use super::model::{self, Model};
use super::record::{DeviceRecord, EnergyCounters};

/// Exact length of an energy response
const ENERGY_LINE_LEN: usize = 19;

/// Bytes covered by the energy checksum
const ENERGY_CHECKSUM_SPAN: usize = 17;

/// Operator consent for a broadcast command.
///
/// Factory reset and set-address are not addressed: every transducer on
/// the bus acts on them and answers at once. Only a caller that has had
/// the operator confirm a single transducer is attached should create one
/// of these.
#[derive(Debug)]
pub struct Confirmed {
    _private: (),
}

impl Confirmed {
    /// The operator accepted the bus-conflict risk (e.g. passed `--force`)
    pub fn by_operator() -> Self {
        Self { _private: () }
    }
}

/// Protocol engine driving one RS-485 bus
pub struct Transducer<C: ByteChannel> {
    transport: LineTransport<C>,
    config: EngineConfig,
    records: Box<[DeviceRecord; ADDRESS_COUNT]>,
}

impl<C: ByteChannel> Transducer<C> {
    /// Take ownership of an already configured channel
    pub fn new(channel: C, config: EngineConfig) -> Self {
        let records = Box::new(std::array::from_fn(|i| DeviceRecord::new(i as u8)));
        Self {
            transport: LineTransport::new(channel, config.poll_interval()),
            config,
            records,
        }
    }

    /// Configuration the engine was created with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// State of the transducer at `address`
    pub fn record(&self, address: u8) -> &DeviceRecord {
        &self.records[address as usize]
    }

    /// Records that have been identified at some point
    pub fn identified(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.records.iter().filter(|r| r.is_identified())
    }

    /// Underlying line transport
    pub fn transport(&self) -> &LineTransport<C> {
        &self.transport
    }

    /// Close the session and return the channel
    pub fn into_channel(self) -> C {
        self.transport.into_inner()
    }

    fn send(&mut self, command: Command) -> Result<(), ProtocolError> {
        let bytes = command.encode();
        let wire = String::from_utf8_lossy(&bytes);
        tracing::debug!(
            address = ?command.address(),
            ?command,
            wire = %wire.trim_end(),
            "send"
        );
        self.transport.write(&bytes)?;
        Ok(())
    }

    fn log_response(&self, what: &str, address: u8, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        if self.config.verbose {
            tracing::info!(address, "{} returned '{}'", what, text);
        } else {
            tracing::debug!(address, "{} returned '{}'", what, text);
        }
    }

    fn require_identified(&self, address: u8) -> Result<Model, ProtocolError> {
        let model = self.records[address as usize].model;
        if model.is_identified() {
            Ok(model)
        } else {
            Err(ProtocolError::NotIdentified(address))
        }
    }

    /// Ask the transducer at `address` for its model and store the model
    /// and full-scale values.
    ///
    /// Fails with [`ProtocolError::UnknownModel`] when nothing answers, the
    /// answer does not start with `!`, or the model name is not known. A
    /// failed identify leaves the record as it was.
    pub fn identify(&mut self, address: u8) -> Result<(), ProtocolError> {
        self.send(Command::ReadModel { address })?;

        let line = match self.transport.read_line() {
            Ok(line) => line,
            Err(e) => {
                if self.config.verbose {
                    tracing::info!(address, "read transducer name returned nothing ({})", e);
                }
                return Err(ProtocolError::UnknownModel);
            }
        };
        self.log_response("read transducer name", address, &line);

        if line.first() != Some(&b'!') {
            return Err(ProtocolError::UnknownModel);
        }
        let name = fields::field(&line, 3, 0).map_err(|_| ProtocolError::UnknownModel)?;
        let Some(spec) = model::lookup(name) else {
            let name = String::from_utf8_lossy(name);
            tracing::warn!(address, model = %name, "unknown transducer model");
            return Err(ProtocolError::UnknownModel);
        };

        let record = &mut self.records[address as usize];
        record.model = spec.model;
        record.max_volts = spec.max_volts;
        record.max_amps = spec.max_amps;
        Ok(())
    }

    /// Read the live values of an identified transducer.
    ///
    /// Values are stored as fractions of full scale.
    pub fn read(&mut self, address: u8) -> Result<(), ProtocolError> {
        let model = self.require_identified(address)?;
        self.send(Command::ReadValues { address })?;

        let line = self
            .transport
            .read_line()
            .map_err(|e| ProtocolError::ReadError(e.to_string()))?;
        self.log_response("read all data", address, &line);

        if line.len() < model.value_line_len() {
            return Err(ProtocolError::ReadError(format!(
                "live values response is {} characters, expected at least {}",
                line.len(),
                model.value_line_len()
            )));
        }

        let mut values = self.records[address as usize].values;
        for spec in model.value_layout() {
            let value = fields::decimal(&line, spec.offset, spec.width)?;
            values.set(spec.quantity, value);
        }

        self.records[address as usize].values = values;
        Ok(())
    }

    /// Read the energy totalizers of an identified transducer.
    ///
    /// The response must be exactly 19 characters and carry a valid
    /// checksum; otherwise the record is left untouched.
    pub fn read_energy(&mut self, address: u8) -> Result<(), ProtocolError> {
        self.require_identified(address)?;
        self.send(Command::ReadEnergy { address })?;

        let line = self
            .transport
            .read_line()
            .map_err(|e| ProtocolError::ReadError(e.to_string()))?;
        self.log_response("read energy", address, &line);

        let counters = parse_energy(&line)?;
        self.records[address as usize].energy = counters;
        Ok(())
    }

    /// Clear the energy totalizers of an identified transducer.
    ///
    /// The current time period is read back first because the clear command
    /// has to name it. It goes into the command only; the record keeps the
    /// period from the last [`Self::read_energy`]. A missing or unexpected
    /// response at either step is a [`ProtocolError::ClearError`].
    pub fn clear_energy(&mut self, address: u8) -> Result<(), ProtocolError> {
        self.require_identified(address)?;
        self.send(Command::ReadEnergy { address })?;

        let line = self.transport.read_line().map_err(|e| {
            tracing::debug!(address, "no energy response before clear: {}", e);
            ProtocolError::ClearError
        })?;
        self.log_response("read energy", address, &line);

        let digits = fields::field(&line, 1, 2).map_err(|_| ProtocolError::ClearError)?;
        let time_period = fields::lenient_hex(digits);

        self.send(Command::ClearEnergy {
            address,
            time_period,
        })?;

        let echo = self.transport.read_line().map_err(|e| {
            tracing::debug!(address, "no clear confirmation: {}", e);
            ProtocolError::ClearError
        })?;
        self.log_response("clear energy", address, &echo);

        if echo != commands::clear_ack(address) {
            return Err(ProtocolError::ClearError);
        }
        Ok(())
    }

    /// Try to identify every address on the bus and return how many
    /// answered with a known model.
    ///
    /// Always walks all 256 addresses. Each silent address costs a full
    /// poll interval, so with the default one second a scan takes minutes.
    pub fn scan(&mut self) -> usize {
        let mut found = 0;
        for address in 0..=u8::MAX {
            match self.identify(address) {
                Ok(()) => {
                    let record = self.record(address);
                    tracing::info!(
                        address,
                        max_volts = record.max_volts,
                        max_amps = record.max_amps,
                        "found transducer"
                    );
                    found += 1;
                }
                Err(e) => tracing::trace!(address, "no transducer: {}", e),
            }
        }
        found
    }

    /// Reset whatever transducer is on the bus to factory defaults.
    ///
    /// The command is unaddressed; with more than one transducer attached
    /// they all reset and answer at once.
    pub fn reset(&mut self, _confirmed: &Confirmed) -> Result<(), ProtocolError> {
        self.send(Command::FactoryReset)?;

        let reply = self.transport.read_fixed(RESET_ACK.len()).map_err(|e| {
            tracing::debug!("no reset acknowledge: {}", e);
            ProtocolError::ResetError
        })?;
        tracing::debug!(reply = ?reply, "reset reply");

        if reply.as_slice() != RESET_ACK {
            return Err(ProtocolError::ResetError);
        }
        Ok(())
    }

    /// Give the transducer on the bus a new address.
    ///
    /// Like [`Self::reset`] this is a broadcast. Callers normally reset the
    /// transducer first and let it settle before and after this call.
    pub fn set_address(
        &mut self,
        new_address: u8,
        _confirmed: &Confirmed,
    ) -> Result<(), ProtocolError> {
        self.send(Command::SetAddress { new_address })?;

        let expected = commands::set_address_ack(new_address);
        let echo = self.transport.read_fixed(expected.len()).map_err(|e| {
            tracing::debug!(new_address, "no set-address echo: {}", e);
            ProtocolError::SetAddressError(new_address)
        })?;
        self.log_response("set address", new_address, &echo);

        if echo != expected {
            return Err(ProtocolError::SetAddressError(new_address));
        }
        Ok(())
    }
}

/// Validate and decode a 19-character energy response.
///
/// Layout: time period (leading decimal digits, 1..3; anything else reads
/// as 0), kWh counter (hex, 3..10),
/// kVARh counter (hex, 10..17), checksum (hex, 17..19). The checksum is the
/// 8-bit sum of bytes 0..17.
pub fn parse_energy(line: &[u8]) -> Result<EnergyCounters, ProtocolError> {
    if line.len() != ENERGY_LINE_LEN {
        return Err(ProtocolError::ReadError(format!(
            "energy response is {} characters, expected {}",
            line.len(),
            ENERGY_LINE_LEN
        )));
    }

    let computed = fields::checksum(&line[..ENERGY_CHECKSUM_SPAN]);
    let received = fields::hex(line, ENERGY_CHECKSUM_SPAN, 2)? as u8;
    if computed != received {
        let text = String::from_utf8_lossy(line);
        tracing::warn!(computed, received, line = %text, "energy checksum mismatch");
        return Err(ProtocolError::ChecksumMismatch {
            expected: computed,
            actual: received,
        });
    }

    Ok(EnergyCounters {
        time_period: u8::try_from(fields::leading_decimal(&line[1..3])).unwrap_or(0),
        kwhr: fields::hex(line, 3, 7)?,
        kvarhr: fields::hex(line, 10, 7)?,
    })
}
