use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::lookup_host;

use crate::error::{PcieError, Result};

/// Environment variable overriding the sysfs root when no flag is given.
pub const SYSFS_ENV_VAR: &str = "PCIE_EXPORTER_SYSFS";
pub const DEFAULT_SYSFS_ROOT: &str = "/sys";
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9808";

#[derive(Debug, Clone, PartialEq)]
pub struct ExporterConfig {
    pub listen_address: String,
    pub sysfs_root: PathBuf,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
        }
    }
}

impl ExporterConfig {
    /// Build the configuration from command-line values, falling back to the
    /// environment and then to defaults.
    pub fn resolve(listen_address: Option<&str>, sysfs_root: Option<&str>) -> Self {
        Self {
            listen_address: listen_address
                .filter(|a| !a.is_empty())
                .unwrap_or(DEFAULT_LISTEN_ADDRESS)
                .to_string(),
            sysfs_root: resolve_sysfs_root(sysfs_root),
        }
    }

    /// The `host:port` string handed to the resolver. A bare `:port` binds
    /// every interface.
    pub fn bind_address(&self) -> String {
        if self.listen_address.starts_with(':') {
            format!("0.0.0.0{}", self.listen_address)
        } else {
            self.listen_address.clone()
        }
    }

    /// Resolve the listen address, accepting host names as well as IP
    /// literals. The first resolved address is used.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        let mut addrs = lookup_host(self.bind_address()).await.map_err(|e| {
            PcieError::config(format!("invalid listen address {}: {}", self.listen_address, e))
        })?;

        addrs.next().ok_or_else(|| {
            PcieError::config(format!(
                "invalid listen address {}: no addresses resolved",
                self.listen_address
            ))
        })
    }
}

/// Flag wins, then `PCIE_EXPORTER_SYSFS`, then `/sys`.
pub fn resolve_sysfs_root(flag: Option<&str>) -> PathBuf {
    if let Some(flag) = flag.filter(|f| !f.is_empty()) {
        return PathBuf::from(flag);
    }

    match env::var(SYSFS_ENV_VAR) {
        Ok(from_env) if !from_env.is_empty() => PathBuf::from(from_env),
        _ => PathBuf::from(DEFAULT_SYSFS_ROOT),
    }
}
