use anyhow::{bail, Result};
use clap::ArgMatches;

use crate::core::pcie::bandwidth::{throughput_gbps, VERSION_BANDWIDTH};
use crate::ui::{format_throughput, print_bandwidth_table};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let version = matches.get_one::<String>("gen");
    let lanes = matches.get_one::<u32>("lanes").copied();

    match (version, lanes) {
        (Some(version), Some(lanes)) => {
            let gbps = throughput_gbps(version, lanes)?;
            println!("PCIe {} x{}: {}", version, lanes, format_throughput(gbps));
        }
        (Some(version), None) => match VERSION_BANDWIDTH.get(version.as_str()) {
            Some(entry) => print_bandwidth_table([entry]),
            None => bail!("unsupported PCIe version {:?}", version),
        },
        (None, Some(_)) => bail!("--lanes requires --gen"),
        (None, None) => print_bandwidth_table(VERSION_BANDWIDTH.values()),
    }

    Ok(())
}
