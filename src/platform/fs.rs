//! Filesystem access for sysfs-style trees.
//!
//! The PCIe readers never touch `std::fs` directly; they go through
//! [`SysfsSource`] so tests can drive them with synthetic trees and
//! injected I/O failures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only view over a device filesystem.
pub trait SysfsSource: Send + Sync {
    /// List the entry names of a directory, in no particular order.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Read a text attribute, trimmed of surrounding whitespace.
    ///
    /// A missing file is `Ok(None)`; any other failure is an error.
    fn read_optional(&self, path: &Path) -> io::Result<Option<String>>;

    /// Resolve every symlink in `path` to an absolute canonical path.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// [`SysfsSource`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSysfs;

impl SysfsSource for LocalSysfs {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn read_optional(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read(path) {
            Ok(buf) => Ok(Some(String::from_utf8_lossy(&buf).trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}
