use pcie_exporter::core::config::{resolve_sysfs_root, ExporterConfig, SYSFS_ENV_VAR};
use std::env;
use std::path::PathBuf;

#[test]
fn test_config_default() {
    let config = ExporterConfig::default();
    assert_eq!(config.listen_address, ":9808");
    assert_eq!(config.sysfs_root, PathBuf::from("/sys"));
}

// Single test owns the environment variable so parallel tests cannot race on it.
#[test]
fn test_resolve_sysfs_root_precedence() {
    env::set_var(SYSFS_ENV_VAR, "/from/env");
    assert_eq!(resolve_sysfs_root(Some("/from/flag")), PathBuf::from("/from/flag"));
    assert_eq!(resolve_sysfs_root(None), PathBuf::from("/from/env"));
    assert_eq!(resolve_sysfs_root(Some("")), PathBuf::from("/from/env"));

    env::set_var(SYSFS_ENV_VAR, "");
    assert_eq!(resolve_sysfs_root(None), PathBuf::from("/sys"));

    env::remove_var(SYSFS_ENV_VAR);
    assert_eq!(resolve_sysfs_root(None), PathBuf::from("/sys"));

    let config = ExporterConfig::resolve(Some("127.0.0.1:9000"), Some("/host/sys"));
    assert_eq!(config.listen_address, "127.0.0.1:9000");
    assert_eq!(config.sysfs_root, PathBuf::from("/host/sys"));
}
