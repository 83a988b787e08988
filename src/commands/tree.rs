use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::resolve_sysfs_root;
use crate::core::pcie::read_tree;
use crate::ui::print_tree;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let sysfs_root = resolve_sysfs_root(matches.get_one::<String>("sysfs-root").map(String::as_str));

    let roots = read_tree(&sysfs_root)
        .with_context(|| format!("Failed to read PCIe topology under {}", sysfs_root.display()))?;

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&roots).context("Failed to serialize topology")?;
        println!("{}", json);
    } else {
        print_tree(&roots);
    }

    Ok(())
}
