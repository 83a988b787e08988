//! Theoretical PCIe throughput per generation and lane count.
//!
//! Values are single-direction and account for line encoding only
//! (8b/10b for Gen1/Gen2, 128b/130b from Gen3 on), not for higher-layer
//! protocol overhead.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::error::{PcieError, Result};

/// Lane widths covered by the table.
pub const LANE_COUNTS: [u32; 5] = [1, 2, 4, 8, 16];

/// Bandwidth reference for one PCIe generation.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionBandwidth {
    pub version: &'static str,
    pub transfer_rate_gtps: f64,
    pub throughput_gbps: BTreeMap<u32, f64>,
}

impl VersionBandwidth {
    fn new(version: &'static str, transfer_rate_gtps: f64, x1_gbps: f64) -> Self {
        let throughput_gbps = LANE_COUNTS
            .iter()
            .map(|&lanes| (lanes, x1_gbps * lanes as f64))
            .collect();

        Self {
            version,
            transfer_rate_gtps,
            throughput_gbps,
        }
    }
}

/// Gen1 through Gen5, keyed by generation label.
pub static VERSION_BANDWIDTH: Lazy<BTreeMap<&'static str, VersionBandwidth>> = Lazy::new(|| {
    [
        VersionBandwidth::new("1.0", 2.5, 0.250000),
        VersionBandwidth::new("2.0", 5.0, 0.500000),
        VersionBandwidth::new("3.0", 8.0, 0.984615),
        VersionBandwidth::new("4.0", 16.0, 1.969231),
        VersionBandwidth::new("5.0", 32.0, 3.938462),
    ]
    .into_iter()
    .map(|entry| (entry.version, entry))
    .collect()
});

/// Theoretical single-direction throughput in GB/s for a version/lane pair.
pub fn throughput_gbps(version: &str, lanes: u32) -> Result<f64> {
    let entry = VERSION_BANDWIDTH
        .get(version)
        .ok_or_else(|| PcieError::UnsupportedVersion(version.to_string()))?;

    entry
        .throughput_gbps
        .get(&lanes)
        .copied()
        .ok_or(PcieError::UnsupportedLaneCount(lanes))
}

/// Map a link transfer rate such as the `16.0` of `"16.0 GT/s PCIe"` to its
/// generation label.
pub fn version_for_transfer_rate(gtps: f64) -> Option<&'static str> {
    VERSION_BANDWIDTH
        .values()
        .find(|entry| (entry.transfer_rate_gtps - gtps).abs() < 1e-6)
        .map(|entry| entry.version)
}
