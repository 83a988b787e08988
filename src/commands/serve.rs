//! Exporter server command handler.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::ExporterConfig;
use crate::exporter;

/// Execute the serve command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = ExporterConfig::resolve(
        matches.get_one::<String>("listen-address").map(String::as_str),
        matches.get_one::<String>("sysfs-root").map(String::as_str),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("pcie-exporter")
        .build()
        .context("Failed to start async runtime")?;

    runtime
        .block_on(exporter::serve(&config))
        .context("pcie-exporter server failed")
}
