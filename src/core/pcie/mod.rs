//! PCIe discovery from a sysfs tree.
//!
//! Two independent readers walk `<root>/bus/pci/devices` on every call:
//! [`read_devices`] for link negotiation health and [`read_tree`] for the
//! physical topology. Neither keeps state between calls.

pub mod bandwidth;
pub mod device;
pub mod parse;
pub mod topology;

pub use bandwidth::{throughput_gbps, version_for_transfer_rate, VersionBandwidth, LANE_COUNTS};
pub use device::{
    compare_speed, compare_speed_with_tolerance, compare_width, read_devices, read_devices_from,
    Device, LinkComparison, SPEED_TOLERANCE,
};
pub use topology::{
    format_link_summary, parent_from_canonical_path, read_tree, read_tree_from, TreeNode,
};

use std::path::{Path, PathBuf};

use crate::error::{PcieError, Result};
use crate::platform::SysfsSource;

pub const CURRENT_LINK_SPEED: &str = "current_link_speed";
pub const MAX_LINK_SPEED: &str = "max_link_speed";
pub const CURRENT_LINK_WIDTH: &str = "current_link_width";
pub const MAX_LINK_WIDTH: &str = "max_link_width";

/// `<root>/bus/pci/devices`
pub fn devices_dir(sysfs_root: &Path) -> PathBuf {
    sysfs_root.join("bus").join("pci").join("devices")
}

/// List candidate device addresses under the bus directory.
fn list_device_entries(source: &dyn SysfsSource, devices_path: &Path) -> Result<Vec<String>> {
    source
        .list_dir(devices_path)
        .map_err(|e| PcieError::list_devices(devices_path, e))
}

/// Read one optional attribute of a device, tagging I/O failures with the
/// device address and attribute name.
fn read_attribute(
    source: &dyn SysfsSource,
    device_path: &Path,
    address: &str,
    attribute: &'static str,
) -> Result<Option<String>> {
    source
        .read_optional(&device_path.join(attribute))
        .map_err(|e| PcieError::attribute(address, attribute, e))
}

/// The four link attributes, each optional.
#[derive(Debug, Default)]
struct LinkAttributes {
    current_speed: Option<String>,
    max_speed: Option<String>,
    current_width: Option<String>,
    max_width: Option<String>,
}

fn read_link_attributes(
    source: &dyn SysfsSource,
    device_path: &Path,
    address: &str,
) -> Result<LinkAttributes> {
    Ok(LinkAttributes {
        current_speed: read_attribute(source, device_path, address, CURRENT_LINK_SPEED)?,
        max_speed: read_attribute(source, device_path, address, MAX_LINK_SPEED)?,
        current_width: read_attribute(source, device_path, address, CURRENT_LINK_WIDTH)?,
        max_width: read_attribute(source, device_path, address, MAX_LINK_WIDTH)?,
    })
}
