use colored::*;

use crate::core::pcie::{Device, TreeNode, VersionBandwidth, LANE_COUNTS};
use crate::ui::formatters::{flatten_tree, format_ratio, format_throughput, format_tree_indent};

fn print_section_header(title: &str) {
    println!("\n{}", title.bold().green());
    println!("{}", "-".repeat(title.len()));
}

pub fn print_devices(devices: &[Device]) {
    print_section_header("PCIe LINKS");

    if devices.is_empty() {
        println!("  {}", "No PCIe devices with link data found".dimmed());
        return;
    }

    for device in devices {
        let status = if device.negotiated_ok {
            "OK".green()
        } else {
            "DEGRADED".red()
        };

        println!(
            "\n  {} [{}] {}:{} class {}",
            device.address.bold(),
            status,
            device.vendor_id,
            device.device_id,
            device.class
        );
        println!(
            "    Speed: {} of {} ({})",
            device.current_link_speed,
            device.max_link_speed,
            format_ratio(device.speed_ratio)
        );
        println!(
            "    Width: {} of {} ({})",
            device.current_link_width,
            device.max_link_width,
            format_ratio(device.width_ratio)
        );
        if let Some(gbps) = device.negotiated_throughput_gbps() {
            println!("    Throughput: {}", format_throughput(gbps));
        }
    }

    let degraded = devices.iter().filter(|d| !d.negotiated_ok).count();
    println!();
    if degraded == 0 {
        println!("{}", format!("All {} links at maximum", devices.len()).green());
    } else {
        println!(
            "{}",
            format!("{} of {} links below maximum", degraded, devices.len()).yellow()
        );
    }
}

pub fn print_tree(roots: &[TreeNode]) {
    print_section_header("PCIe TOPOLOGY");

    if roots.is_empty() {
        println!("  {}", "No PCIe devices found".dimmed());
        return;
    }

    for flattened in flatten_tree(roots) {
        let node = flattened.node;
        println!(
            "  {}{} {} {}",
            format_tree_indent(&flattened).dimmed(),
            node.bus_id.bold(),
            node.name.cyan(),
            format!("[{} / {}]", node.link_status, node.link_capacity).dimmed()
        );
    }
}

pub fn print_bandwidth_table<'a>(entries: impl IntoIterator<Item = &'a VersionBandwidth>) {
    print_section_header("PCIe THEORETICAL THROUGHPUT (GB/s, per direction)");

    let mut header = format!("  {:<8}{:>8}", "Gen", "GT/s");
    for lanes in LANE_COUNTS {
        header.push_str(&format!("{:>10}", format!("x{}", lanes)));
    }
    println!("{}", header.bold());

    for entry in entries {
        let mut row = format!("  {:<8}{:>8.1}", entry.version, entry.transfer_rate_gtps);
        for lanes in LANE_COUNTS {
            let value = entry.throughput_gbps.get(&lanes).copied().unwrap_or_default();
            row.push_str(&format!("{:>10.2}", value));
        }
        println!("{}", row);
    }
}
