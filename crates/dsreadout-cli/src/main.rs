//! dsreadout - Datastream energy transducer tool
//!
//! Reads, clears, scans and re-addresses transducers on an RS-485 bus.

mod cli;
mod config;
mod logging;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use dsreadout_core::prelude::*;
use dsreadout_core::protocol::list_ports;

use cli::{Cli, Commands};
use config::CliConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Refuse a broadcast command unless the operator passed `--force`
fn confirm(force: bool) -> anyhow::Result<Confirmed> {
    if !force {
        bail!(
            "WARNING! THIS IS A DANGEROUS OPERATION!\n\
             This operation will cause bus conflicts if your transducers are networked.\n\
             If you are sure what you are doing, add the option '--force'."
        );
    }
    Ok(Confirmed::by_operator())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.command == Commands::Ports {
        for port in list_ports() {
            match &port.product {
                Some(product) => println!("{} ({})", port.name, product),
                None => println!("{}", port.name),
            }
        }
        return Ok(());
    }

    let mut config = CliConfig::load(cli.config.as_deref())?;
    config.engine.verbose |= cli.verbose;

    // Check the gate before touching the bus
    let confirmed = match cli.command {
        Commands::SetAddress { force, .. } | Commands::Reset { force } => Some(confirm(force)?),
        _ => None,
    };

    let Some(device) = cli.device.as_deref() else {
        bail!("No device given; use --device or DSREADOUT_DEVICE");
    };
    let port = open_port(device, Some(cli.baud))
        .with_context(|| format!("Unable to open device `{}'", device))?;
    let mut bus = Transducer::new(SerialChannel::new(port), config.engine.clone());

    match (cli.command, confirmed) {
        (Commands::Identify { address }, _) => {
            bus.identify(address).context("Unknown transducer model.")?;
            print!("{}", output::identity(bus.record(address), cli.json)?);
        }
        (Commands::Read { address }, _) => {
            bus.identify(address).context("Unknown transducer model.")?;
            bus.read(address)
                .and_then(|_| bus.read_energy(address))
                .context("Unable to read transducer.")?;
            let Some(reading) = Reading::from_record(bus.record(address)) else {
                bail!("Unknown transducer model.");
            };
            print!("{}", output::reading(&reading, cli.json)?);
        }
        (Commands::Clear { address }, _) => {
            bus.identify(address).context("Unknown transducer model.")?;
            bus.clear_energy(address)
                .context("Unable to clear transducer energy values.")?;
        }
        (Commands::Scan, _) => {
            let count = bus.scan();
            print!("{}", output::scan(bus.identified(), count, cli.json)?);
        }
        (Commands::SetAddress { address, .. }, Some(confirmed)) => {
            if let Err(e) = bus.reset(&confirmed) {
                tracing::warn!("factory reset not acknowledged: {}", e);
            }
            std::thread::sleep(Duration::from_secs(config.reset_settle_secs));
            bus.set_address(address, &confirmed)
                .context("Unable to set transducer address.")?;
            std::thread::sleep(Duration::from_secs(config.address_settle_secs));
        }
        (Commands::Reset { .. }, Some(confirmed)) => {
            bus.reset(&confirmed)
                .context("Unable to reset transducer.")?;
        }
        (Commands::SetAddress { .. } | Commands::Reset { .. } | Commands::Ports, _) => {
            unreachable!("handled above")
        }
    }

    Ok(())
}
