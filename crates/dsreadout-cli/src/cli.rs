//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dsreadout_core::protocol::DEFAULT_BAUD_RATE;

/// Datastream energy transducer tool
#[derive(Parser, Debug)]
#[command(name = "dsreadout", version = dsreadout_core::VERSION, about, long_about = None)]
pub struct Cli {
    /// Serial device the RS-485 bus is attached to
    #[arg(short, long, env = "DSREADOUT_DEVICE", global = true)]
    pub device: Option<String>,

    /// Baud rate of the bus
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE, global = true)]
    pub baud: u32,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show what the transducers return
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Identify transducer
    Identify {
        #[arg(value_parser = parse_address)]
        address: u8,
    },

    /// Show current values
    Read {
        #[arg(value_parser = parse_address)]
        address: u8,
    },

    /// Clear energy totalizer
    Clear {
        #[arg(value_parser = parse_address)]
        address: u8,
    },

    /// Scan all 256 addresses for transducers. Very slow!
    Scan,

    /// Reset the transducer and set the transducer address. USE WITH CARE!
    #[command(name = "set-address")]
    SetAddress {
        #[arg(value_parser = parse_address)]
        address: u8,

        /// Confirm that only one transducer is attached to the bus
        #[arg(short, long)]
        force: bool,
    },

    /// Reset the transducer to its factory defaults. USE WITH CARE!
    Reset {
        /// Confirm that only one transducer is attached to the bus
        #[arg(short, long)]
        force: bool,
    },

    /// List serial ports
    Ports,
}

/// Parse a bus address given in decimal or as `0x`-prefixed hex
pub fn parse_address(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|_| format!("'{}' is not an address between 0 and 255", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("5"), Ok(5));
        assert_eq!(parse_address("255"), Ok(255));
        assert_eq!(parse_address("0x2A"), Ok(0x2A));
        assert_eq!(parse_address("0Xff"), Ok(0xFF));
        assert!(parse_address("256").is_err());
        assert!(parse_address("-1").is_err());
        assert!(parse_address("0x100").is_err());
        assert!(parse_address("abc").is_err());
    }

    #[test]
    fn test_parse_read() {
        let cli = Cli::try_parse_from(["dsreadout", "-d", "/dev/ttyUSB0", "read", "0x05"]).unwrap();
        assert_eq!(cli.device.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cli.baud, 9600);
        assert_eq!(cli.command, Commands::Read { address: 5 });
    }

    #[test]
    fn test_parse_reset_force() {
        let cli = Cli::try_parse_from(["dsreadout", "reset", "--force", "--device", "/dev/ttyS0"])
            .unwrap();
        assert_eq!(cli.command, Commands::Reset { force: true });

        let cli = Cli::try_parse_from(["dsreadout", "set-address", "12"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::SetAddress {
                address: 12,
                force: false
            }
        );
    }

    #[test]
    fn test_bad_address_rejected() {
        assert!(Cli::try_parse_from(["dsreadout", "identify", "300"]).is_err());
    }
}
