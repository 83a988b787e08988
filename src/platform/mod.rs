// Platform-specific code module

pub mod fs;

// Re-exports for cleaner imports
pub use fs::{LocalSysfs, SysfsSource};
