//! Link negotiation health per PCIe function.

use serde::Serialize;
use std::path::Path;

use super::bandwidth::{throughput_gbps, version_for_transfer_rate};
use super::parse::{parse_first_int, parse_leading_float};
use super::{devices_dir, list_device_entries, read_attribute, read_link_attributes};
use crate::error::Result;
use crate::platform::{LocalSysfs, SysfsSource};

/// Slack allowed when deciding a parsed link speed is at its maximum.
pub const SPEED_TOLERANCE: f64 = 1e-9;

/// One PCIe function with link negotiation data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub address: String,
    pub vendor_id: String,
    pub device_id: String,
    pub class: String,
    pub current_link_speed: String,
    pub max_link_speed: String,
    pub current_link_width: String,
    pub max_link_width: String,
    pub negotiated_ok: bool,
    /// `None` when the speeds could not be compared
    pub speed_ratio: Option<f64>,
    /// `None` when the widths could not be compared
    pub width_ratio: Option<f64>,
}

impl Device {
    /// Theoretical throughput of the link as currently negotiated, when both
    /// the generation and lane count are in the bandwidth table.
    pub fn negotiated_throughput_gbps(&self) -> Option<f64> {
        let version = version_for_transfer_rate(parse_leading_float(&self.current_link_speed)?)?;
        let lanes = u32::try_from(parse_first_int(&self.current_link_width)?).ok()?;
        throughput_gbps(version, lanes).ok()
    }
}

/// Result of comparing a negotiated link value with its maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkComparison {
    pub ratio: Option<f64>,
    pub at_max: bool,
}

impl LinkComparison {
    fn fallback(current: &str, max: &str) -> Self {
        if !current.is_empty() && current == max {
            Self {
                ratio: Some(1.0),
                at_max: true,
            }
        } else {
            Self {
                ratio: None,
                at_max: false,
            }
        }
    }
}

/// Compare link speeds such as `"8.0 GT/s PCIe"` against `"16.0 GT/s PCIe"`.
pub fn compare_speed(current: &str, max: &str) -> LinkComparison {
    compare_speed_with_tolerance(current, max, SPEED_TOLERANCE)
}

pub fn compare_speed_with_tolerance(current: &str, max: &str, tolerance: f64) -> LinkComparison {
    match (parse_leading_float(current), parse_leading_float(max)) {
        (Some(current_value), Some(max_value))
            if max_value > 0.0 && (current_value / max_value).is_finite() =>
        {
            LinkComparison {
                ratio: Some(current_value / max_value),
                at_max: current_value + tolerance >= max_value,
            }
        }
        _ => LinkComparison::fallback(current, max),
    }
}

/// Compare link widths such as `"x8"` against `"16"`.
pub fn compare_width(current: &str, max: &str) -> LinkComparison {
    match (parse_first_int(current), parse_first_int(max)) {
        (Some(current_value), Some(max_value)) if max_value > 0 => LinkComparison {
            ratio: Some(current_value as f64 / max_value as f64),
            at_max: current_value >= max_value,
        },
        _ => LinkComparison::fallback(current, max),
    }
}

/// Enumerate devices with link data from `<sysfs_root>/bus/pci/devices`.
pub fn read_devices(sysfs_root: &Path) -> Result<Vec<Device>> {
    read_devices_from(&LocalSysfs, sysfs_root)
}

/// [`read_devices`] over an arbitrary [`SysfsSource`].
pub fn read_devices_from(source: &dyn SysfsSource, sysfs_root: &Path) -> Result<Vec<Device>> {
    let devices_path = devices_dir(sysfs_root);
    let entries = list_device_entries(source, &devices_path)?;

    let mut devices = Vec::with_capacity(entries.len());
    for address in entries {
        let device_path = devices_path.join(&address);
        if let Some(device) = read_device(source, &device_path, &address)? {
            devices.push(device);
        }
    }

    devices.sort_by(|a, b| a.address.cmp(&b.address));
    log::debug!("read {} PCIe devices with link data", devices.len());

    Ok(devices)
}

fn read_device(
    source: &dyn SysfsSource,
    device_path: &Path,
    address: &str,
) -> Result<Option<Device>> {
    let link = read_link_attributes(source, device_path, address)?;

    // Functions without link negotiation info are not reported.
    let (Some(current_speed), Some(max_speed), Some(current_width), Some(max_width)) = (
        link.current_speed,
        link.max_speed,
        link.current_width,
        link.max_width,
    ) else {
        log::debug!("skipping {}: no link attributes", address);
        return Ok(None);
    };

    let vendor_id = read_attribute(source, device_path, address, "vendor")?.unwrap_or_default();
    let device_id = read_attribute(source, device_path, address, "device")?.unwrap_or_default();
    let class = read_attribute(source, device_path, address, "class")?.unwrap_or_default();

    let speed = compare_speed(&current_speed, &max_speed);
    let width = compare_width(&current_width, &max_width);

    Ok(Some(Device {
        address: address.to_string(),
        vendor_id,
        device_id,
        class,
        current_link_speed: current_speed,
        max_link_speed: max_speed,
        current_link_width: current_width,
        max_link_width: max_width,
        negotiated_ok: speed.at_max && width.at_max,
        speed_ratio: speed.ratio,
        width_ratio: width.ratio,
    }))
}
