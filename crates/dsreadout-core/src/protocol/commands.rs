//! Protocol commands
//!
//! Defines the ASCII commands understood by Datastream transducers.
//! Addresses and the time period are always rendered as two uppercase
//! hex digits and every command ends with a carriage return.

use serde::{Deserialize, Serialize};

/// Literal factory reset command. It carries no address.
pub const FACTORY_RESET: &[u8] = b"@CEAFW\r";

/// Raw bytes a transducer answers a factory reset with
pub const RESET_ACK: [u8; 2] = [0x01, 0x06];

/// Commands sent to transducers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Read the model name (`$AAM`)
    ReadModel {
        /// Bus address
        address: u8,
    },

    /// Read all live values (`#AAA`)
    ReadValues {
        /// Bus address
        address: u8,
    },

    /// Read the energy totalizers (`#AAW`)
    ReadEnergy {
        /// Bus address
        address: u8,
    },

    /// Clear the energy totalizers for a time period (`&AATT`)
    ClearEnergy {
        /// Bus address
        address: u8,
        /// Time period read back from the transducer
        time_period: u8,
    },

    /// Reset to factory defaults (`@CEAFW`). Broadcast.
    FactoryReset,

    /// Assign a new address (`%01AA000601`). Broadcast.
    SetAddress {
        /// Address to assign
        new_address: u8,
    },
}

impl Command {
    /// Encode the command as it goes on the wire
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            Command::ReadModel { address } => format!("${:02X}M\r", address).into_bytes(),
            Command::ReadValues { address } => format!("#{:02X}A\r", address).into_bytes(),
            Command::ReadEnergy { address } => format!("#{:02X}W\r", address).into_bytes(),
            Command::ClearEnergy {
                address,
                time_period,
            } => format!("&{:02X}{:02X}\r", address, time_period).into_bytes(),
            Command::FactoryReset => FACTORY_RESET.to_vec(),
            Command::SetAddress { new_address } => {
                format!("%01{:02X}000601\r", new_address).into_bytes()
            }
        }
    }

    /// Address the command is aimed at, `None` for broadcast commands
    pub fn address(&self) -> Option<u8> {
        match *self {
            Command::ReadModel { address }
            | Command::ReadValues { address }
            | Command::ReadEnergy { address }
            | Command::ClearEnergy { address, .. } => Some(address),
            Command::FactoryReset | Command::SetAddress { .. } => None,
        }
    }
}

/// Confirmation line expected after clearing the energy totalizers.
///
/// The line reader strips the terminating CR, so the comparison is made
/// without it.
pub fn clear_ack(address: u8) -> Vec<u8> {
    format!("!{:02X}", address).into_bytes()
}

/// Echo a transducer sends after taking a new address, as it is on the
/// wire (`!AA\r`)
pub fn set_address_ack(new_address: u8) -> Vec<u8> {
    format!("!{:02X}\r", new_address).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addressed_commands() {
        assert_eq!(Command::ReadModel { address: 5 }.encode(), b"$05M\r".to_vec());
        assert_eq!(Command::ReadValues { address: 5 }.encode(), b"#05A\r".to_vec());
        assert_eq!(Command::ReadEnergy { address: 255 }.encode(), b"#FFW\r".to_vec());
        assert_eq!(
            Command::ClearEnergy {
                address: 0,
                time_period: 0x1B
            }
            .encode(),
            b"&001B\r".to_vec()
        );
    }

    #[test]
    fn test_address_rendering_is_uppercase_and_padded() {
        let commands = [
            Command::ReadModel { address: 0x2A },
            Command::ReadValues { address: 0x2A },
            Command::ReadEnergy { address: 0x2A },
            Command::ClearEnergy {
                address: 0x2A,
                time_period: 0,
            },
        ];
        for cmd in commands {
            let encoded = cmd.encode();
            assert_eq!(&encoded[1..3], b"2A", "{:?}", cmd);
            assert_eq!(encoded.last(), Some(&b'\r'));
        }

        let set = Command::SetAddress { new_address: 0x2A }.encode();
        assert_eq!(set, b"%012A000601\r".to_vec());
        assert_eq!(&set[3..5], b"2A");

        assert_eq!(Command::ReadModel { address: 0x0a }.encode(), b"$0AM\r".to_vec());
    }

    #[test]
    fn test_factory_reset_is_literal() {
        assert_eq!(Command::FactoryReset.encode(), b"@CEAFW\r".to_vec());
        assert_eq!(Command::FactoryReset.address(), None);
        assert_eq!(Command::SetAddress { new_address: 3 }.address(), None);
        assert_eq!(Command::ReadEnergy { address: 3 }.address(), Some(3));
    }

    #[test]
    fn test_acks() {
        assert_eq!(clear_ack(0x2A), b"!2A".to_vec());
        assert_eq!(set_address_ack(0x2A), b"!2A\r".to_vec());
    }
}
