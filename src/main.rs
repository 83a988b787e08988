use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use pcie_exporter::commands;
use pcie_exporter::core::config::DEFAULT_LISTEN_ADDRESS;

fn main() -> Result<()> {
    pcie_exporter::init_logging();

    let matches = Command::new("pcie-exporter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prometheus exporter for PCIe link health and topology")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("sysfs-root")
                .long("sysfs-root")
                .value_name("PATH")
                .help("sysfs root path override (defaults to /sys or PCIE_EXPORTER_SYSFS)")
                .global(true)
        )
        .subcommand(
            Command::new("serve")
                .about("Serve /metrics, /pcie-tree and /healthz over HTTP")
                .arg(
                    Arg::new("listen-address")
                        .short('l')
                        .long("listen-address")
                        .value_name("ADDR")
                        .help("HTTP listen address")
                        .default_value(DEFAULT_LISTEN_ADDRESS)
                )
        )
        .subcommand(
            Command::new("devices")
                .about("Show negotiated link speed and width for every PCIe device")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print devices as JSON")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("tree")
                .about("Show the PCIe topology tree")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the tree as JSON")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("bandwidth")
                .about("Show theoretical PCIe throughput per generation and lane count")
                .arg(
                    Arg::new("gen")
                        .short('g')
                        .long("gen")
                        .value_name("VERSION")
                        .help("PCIe generation, e.g. 4.0")
                )
                .arg(
                    Arg::new("lanes")
                        .short('x')
                        .long("lanes")
                        .value_name("N")
                        .help("Lane count (1, 2, 4, 8 or 16)")
                        .value_parser(clap::value_parser!(u32))
                )
        )
        .subcommand(
            Command::new("version")
                .about("Shows version information")
        )
        .get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("serve", sub_matches)) => commands::serve(sub_matches),
        Some(("devices", sub_matches)) => commands::devices(sub_matches),
        Some(("tree", sub_matches)) => commands::tree(sub_matches),
        Some(("bandwidth", sub_matches)) => commands::bandwidth(sub_matches),
        Some(("version", _)) => commands::version(),
        _ => {
            println!("Welcome to pcie-exporter!");
            println!("Use 'pcie-exporter --help' for more information.");
            Ok(())
        }
    }
}
