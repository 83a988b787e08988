// pcie-exporter library - Public API

// Re-export error types
pub mod error;
pub use error::{PcieError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod exporter;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::ExporterConfig;
pub use crate::core::pcie::{read_devices, read_tree, Device, TreeNode};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
