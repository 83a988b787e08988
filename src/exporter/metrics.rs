//! Prometheus text exposition for PCIe link health.

use std::fmt::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::core::pcie::{read_devices, Device};
use crate::error::Result;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Process-wide scrape totals, shared by every request handler.
#[derive(Debug, Default)]
pub struct ScrapeCounters {
    scrapes: AtomicU64,
    errors: AtomicU64,
}

impl ScrapeCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one scrape, and one error when it failed.
    pub fn record(&self, success: bool) {
        self.scrapes.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn scrapes(&self) -> u64 {
        self.scrapes.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

/// Read devices under `sysfs_root`, update `counters` and render the page.
pub fn scrape_metrics(sysfs_root: &Path, counters: &ScrapeCounters) -> String {
    let start = Instant::now();
    let result = read_devices(sysfs_root);
    let duration = start.elapsed();

    counters.record(result.is_ok());
    match &result {
        Ok(devices) => log::debug!("scraped {} PCIe devices in {:?}", devices.len(), duration),
        Err(e) => log::warn!("PCIe scrape failed: {}", e),
    }

    render_metrics(&result, duration, counters)
}

/// Render the metrics page for one scrape result.
///
/// A failed scrape still yields the process counters, with
/// `pcie_exporter_last_scrape_success 0` and a trailing error comment.
pub fn render_metrics(
    result: &Result<Vec<Device>>,
    duration: Duration,
    counters: &ScrapeCounters,
) -> String {
    let mut out = String::with_capacity(4096);
    // fmt::Write into a String cannot fail
    let _ = write_metrics(&mut out, result, duration, counters);
    out
}

fn write_metrics(
    out: &mut String,
    result: &Result<Vec<Device>>,
    duration: Duration,
    counters: &ScrapeCounters,
) -> fmt::Result {
    let devices: &[Device] = match result {
        Ok(devices) => devices,
        Err(_) => &[],
    };

    write_header(out, "pcie_devices_total", "Number of PCIe devices with link data in sysfs.", "gauge")?;
    writeln!(out, "pcie_devices_total {}", devices.len())?;

    write_header(
        out,
        "pcie_link_negotiated_ok",
        "Whether negotiated PCIe link speed and width match maximum supported values.",
        "gauge",
    )?;
    write_header(
        out,
        "pcie_link_speed_ratio",
        "Negotiated link speed divided by max supported link speed.",
        "gauge",
    )?;
    write_header(
        out,
        "pcie_link_width_ratio",
        "Negotiated link width divided by max supported link width.",
        "gauge",
    )?;

    for device in devices {
        let labels = metric_labels(device);
        writeln!(
            out,
            "pcie_link_negotiated_ok{} {}",
            labels,
            u8::from(device.negotiated_ok)
        )?;
        if let Some(ratio) = device.speed_ratio {
            writeln!(out, "pcie_link_speed_ratio{} {:.6}", labels, ratio)?;
        }
        if let Some(ratio) = device.width_ratio {
            writeln!(out, "pcie_link_width_ratio{} {:.6}", labels, ratio)?;
        }
    }

    write_header(out, "pcie_exporter_scrapes_total", "Total number of metrics scrapes.", "counter")?;
    writeln!(out, "pcie_exporter_scrapes_total {}", counters.scrapes())?;

    write_header(
        out,
        "pcie_exporter_scrape_errors_total",
        "Total number of scrape-level errors.",
        "counter",
    )?;
    writeln!(out, "pcie_exporter_scrape_errors_total {}", counters.errors())?;

    write_header(
        out,
        "pcie_exporter_last_scrape_duration_seconds",
        "Duration of the most recent scrape in seconds.",
        "gauge",
    )?;
    writeln!(
        out,
        "pcie_exporter_last_scrape_duration_seconds {:.6}",
        duration.as_secs_f64()
    )?;

    write_header(
        out,
        "pcie_exporter_last_scrape_success",
        "Whether the most recent scrape succeeded.",
        "gauge",
    )?;
    writeln!(out, "pcie_exporter_last_scrape_success {}", u8::from(result.is_ok()))?;

    if let Err(e) = result {
        writeln!(out, "# pcie_exporter_error {}", escape_label_value(&e.to_string()))?;
    }

    Ok(())
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) -> fmt::Result {
    writeln!(out, "# HELP {} {}", name, help)?;
    writeln!(out, "# TYPE {} {}", name, kind)
}

fn metric_labels(device: &Device) -> String {
    let labels = [
        ("device", &device.address),
        ("vendor_id", &device.vendor_id),
        ("device_id", &device.device_id),
        ("class", &device.class),
        ("current_link_speed", &device.current_link_speed),
        ("max_link_speed", &device.max_link_speed),
        ("current_link_width", &device.current_link_width),
        ("max_link_width", &device.max_link_width),
    ];

    let pairs: Vec<String> = labels
        .iter()
        .map(|(name, value)| format!("{}=\"{}\"", name, escape_label_value(value)))
        .collect();
    format!("{{{}}}", pairs.join(","))
}

/// Escape `\`, `"` and newlines for label values and comments.
pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
