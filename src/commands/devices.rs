use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::resolve_sysfs_root;
use crate::core::pcie::read_devices;
use crate::ui::print_devices;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let sysfs_root = resolve_sysfs_root(matches.get_one::<String>("sysfs-root").map(String::as_str));

    let devices = read_devices(&sysfs_root)
        .with_context(|| format!("Failed to read PCIe devices under {}", sysfs_root.display()))?;

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&devices).context("Failed to serialize devices")?;
        println!("{}", json);
    } else {
        print_devices(&devices);
    }

    Ok(())
}
