//! PCIe topology reconstruction.
//!
//! sysfs places every function's canonical directory beneath the bridges
//! that lead to it, e.g.
//! `/sys/devices/pci0000:00/0000:00:01.0/0000:01:00.0`. The parent of a
//! device is therefore the PCI address immediately preceding its own in
//! that path.

use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path};

use super::parse::{is_pci_address, parse_first_int, trim_hex_prefix};
use super::{devices_dir, list_device_entries, read_attribute, read_link_attributes};
use crate::error::{PcieError, Result};
use crate::platform::{LocalSysfs, SysfsSource};

/// One device in the topology forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub bus_id: String,
    pub name: String,
    pub link_capacity: String,
    pub link_status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

/// Build the topology forest from `<sysfs_root>/bus/pci/devices`.
pub fn read_tree(sysfs_root: &Path) -> Result<Vec<TreeNode>> {
    read_tree_from(&LocalSysfs, sysfs_root)
}

/// [`read_tree`] over an arbitrary [`SysfsSource`].
pub fn read_tree_from(source: &dyn SysfsSource, sysfs_root: &Path) -> Result<Vec<TreeNode>> {
    let devices_path = devices_dir(sysfs_root);
    let entries = list_device_entries(source, &devices_path)?;

    // First pass: every node and its physical parent, keyed by address.
    let mut nodes: HashMap<String, TreeNode> = HashMap::with_capacity(entries.len());
    let mut parents: HashMap<String, String> = HashMap::with_capacity(entries.len());

    for entry in &entries {
        let address = entry.to_lowercase();
        let device_path = devices_path.join(entry);

        let node = read_tree_node(source, &device_path, &address)?;
        nodes.insert(address.clone(), node);

        if let Some(parent) = resolve_parent_address(source, &device_path, &address)? {
            parents.insert(address, parent);
        }
    }

    // Second pass: link children to parents that were enumerated too.
    let mut children_of: HashMap<String, Vec<String>> = HashMap::new();
    let mut root_addresses = Vec::new();
    for address in nodes.keys() {
        match parents.get(address) {
            Some(parent) if nodes.contains_key(parent) => {
                children_of
                    .entry(parent.clone())
                    .or_default()
                    .push(address.clone());
            }
            _ => root_addresses.push(address.clone()),
        }
    }

    let mut roots = Vec::with_capacity(root_addresses.len());
    for address in &root_addresses {
        if let Some(node) = assemble(address, &mut nodes, &children_of) {
            roots.push(node);
        }
    }

    // Only a malformed tree whose paths point at each other leaves nodes
    // unreached; surface them as roots instead of dropping them.
    while let Some(address) = nodes.keys().min().cloned() {
        log::warn!("PCIe device {} has a cyclic parent chain", address);
        if let Some(node) = assemble(&address, &mut nodes, &children_of) {
            roots.push(node);
        }
    }

    sort_tree(&mut roots);
    Ok(roots)
}

/// Detach `address` from `nodes` with its whole subtree populated.
fn assemble(
    address: &str,
    nodes: &mut HashMap<String, TreeNode>,
    children_of: &HashMap<String, Vec<String>>,
) -> Option<TreeNode> {
    let mut node = nodes.remove(address)?;

    if let Some(children) = children_of.get(address) {
        for child in children {
            if let Some(child_node) = assemble(child, nodes, children_of) {
                node.children.push(child_node);
            }
        }
    }

    Some(node)
}

fn sort_tree(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| a.bus_id.cmp(&b.bus_id));
    for node in nodes {
        sort_tree(&mut node.children);
    }
}

fn read_tree_node(source: &dyn SysfsSource, device_path: &Path, address: &str) -> Result<TreeNode> {
    let name = read_device_name(source, device_path, address)?;
    let link = read_link_attributes(source, device_path, address)?;

    Ok(TreeNode {
        bus_id: address.to_string(),
        name,
        link_capacity: format_link_summary(
            link.max_speed.as_deref().unwrap_or_default(),
            link.max_width.as_deref().unwrap_or_default(),
        ),
        link_status: format_link_summary(
            link.current_speed.as_deref().unwrap_or_default(),
            link.current_width.as_deref().unwrap_or_default(),
        ),
        children: Vec::new(),
    })
}

/// Display name: `label`, then bound driver, then `vendor:device`, then the
/// bus address.
fn read_device_name(source: &dyn SysfsSource, device_path: &Path, address: &str) -> Result<String> {
    let label = read_attribute(source, device_path, address, "label")?;
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        return Ok(label);
    }

    if let Some(driver) = read_driver_name(source, device_path) {
        return Ok(driver);
    }

    let vendor = read_attribute(source, device_path, address, "vendor")?.unwrap_or_default();
    let device = read_attribute(source, device_path, address, "device")?.unwrap_or_default();
    let vendor = trim_hex_prefix(&vendor);
    let device = trim_hex_prefix(&device);
    if !vendor.is_empty() || !device.is_empty() {
        return Ok(format!("{}:{}", vendor, device));
    }

    Ok(address.to_string())
}

/// Base name of the `driver` link target. Any failure to resolve it counts
/// as "no driver bound".
fn read_driver_name(source: &dyn SysfsSource, device_path: &Path) -> Option<String> {
    let driver_path = device_path.join("driver");
    let resolved = match source.canonicalize(&driver_path) {
        Ok(path) => path,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                log::debug!("ignoring unreadable driver link {}: {}", driver_path.display(), e);
            }
            return None;
        }
    };

    let name = resolved.file_name()?.to_string_lossy().trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn resolve_parent_address(
    source: &dyn SysfsSource,
    device_path: &Path,
    address: &str,
) -> Result<Option<String>> {
    let resolved = source
        .canonicalize(device_path)
        .map_err(|e| PcieError::resolve_path(address, e))?;
    Ok(parent_from_canonical_path(&resolved, address))
}

/// Find the parent of `address` in a canonical device path.
///
/// PCI address components are collected top-down; the parent is the one
/// right before the last occurrence of `address`. Returns `None` for a root.
pub fn parent_from_canonical_path(path: &Path, address: &str) -> Option<String> {
    let chain: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .filter(|part| is_pci_address(part))
        .map(|part| part.to_lowercase())
        .collect();

    if chain.len() < 2 {
        return None;
    }

    let position = chain.iter().rposition(|part| part == address)?;
    if position == 0 {
        return None;
    }
    Some(chain[position - 1].clone())
}

/// `"<speed> <width>"`, degrading to whichever half is known, or `"unknown"`.
pub fn format_link_summary(speed: &str, width: &str) -> String {
    let speed = speed.trim();
    let width = format_width(width);

    match (speed.is_empty(), width.is_empty()) {
        (true, true) => "unknown".to_string(),
        (true, false) => width,
        (false, true) => speed.to_string(),
        (false, false) => format!("{} {}", speed, width),
    }
}

/// Normalize a link width to `x<N>` where possible.
fn format_width(width: &str) -> String {
    let width = width.trim();
    if width.is_empty() {
        return String::new();
    }

    if width.starts_with(['x', 'X']) {
        let rest = width.strip_prefix('x').unwrap_or(width);
        let rest = rest.strip_prefix('X').unwrap_or(rest);
        return format!("x{}", rest);
    }

    match parse_first_int(width) {
        Some(lanes) => format!("x{}", lanes),
        None => width.to_string(),
    }
}
