// UI and formatting module

pub mod formatters;
pub mod pcie_formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{flatten_tree, format_ratio, format_throughput, format_tree_indent};
pub use pcie_formatters::{print_bandwidth_table, print_devices, print_tree};
