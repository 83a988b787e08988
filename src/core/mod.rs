// Core business logic module

pub mod config;
pub mod pcie;

// Re-export commonly used items
pub use config::ExporterConfig;
pub use pcie::{read_devices, read_tree, Device, TreeNode};
