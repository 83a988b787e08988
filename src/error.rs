use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the PCIe exporter
#[derive(Error, Debug)]
pub enum PcieError {
    #[error("read pci devices from {}: {source}", .path.display())]
    ListDevices {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read {attribute} for {address}: {source}")]
    Attribute {
        address: String,
        attribute: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("resolve symlink for {address}: {source}")]
    ResolvePath {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("unsupported PCIe version {0:?}")]
    UnsupportedVersion(String),

    #[error("unsupported lane count {0}")]
    UnsupportedLaneCount(u32),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the PCIe exporter
pub type Result<T> = std::result::Result<T, PcieError>;

impl PcieError {
    /// Create a device listing error for the given bus directory
    pub fn list_devices<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        PcieError::ListDevices {
            path: path.into(),
            source,
        }
    }

    /// Create an attribute read error
    pub fn attribute<S: Into<String>>(address: S, attribute: &'static str, source: io::Error) -> Self {
        PcieError::Attribute {
            address: address.into(),
            attribute,
            source,
        }
    }

    pub fn resolve_path<S: Into<String>>(address: S, source: io::Error) -> Self {
        PcieError::ResolvePath {
            address: address.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PcieError::Config(msg.into())
    }

    /// Create an HTTP server error
    pub fn server<S: Into<String>>(msg: S) -> Self {
        PcieError::Server(msg.into())
    }
}
