// Command handlers module
pub mod bandwidth;
pub mod devices;
pub mod serve;
pub mod tree;
pub mod version;

// Re-exports for cleaner imports
pub use bandwidth::execute as bandwidth;
pub use devices::execute as devices;
pub use serve::execute as serve;
pub use tree::execute as tree;
pub use version::execute as version;
