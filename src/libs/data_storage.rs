//! Location of the files wadash keeps between runs.
//!
//! Only the configuration file lives here today. The directory is resolved
//! in this order:
//!
//! 1. `WADASH_DATA_DIR`, used as-is
//! 2. the platform data directory (`%LOCALAPPDATA%`, `~/Library/Application Support`
//!    or `~/.local/share`) joined with `wadash`
//! 3. `./wadash` when neither `HOME` nor `LOCALAPPDATA` is set

use anyhow::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "WADASH_DATA_DIR";

const DIR_NAME: &str = "wadash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStorage {
    root: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Storage rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the directory from an arbitrary variable lookup.
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            return Self::at(dir);
        }

        let platform_dir = if cfg!(windows) {
            lookup("LOCALAPPDATA").map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            lookup("HOME").map(|home| Path::new(&home).join("Library").join("Application Support"))
        } else {
            lookup("HOME").map(|home| Path::new(&home).join(".local").join("share"))
        };

        Self::at(platform_dir.unwrap_or_else(|| PathBuf::from(".")).join(DIR_NAME))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `file_name` inside the storage directory; nothing is created.
    pub fn file(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Like [`DataStorage::file`], creating the directory first so the file
    /// can be written.
    pub fn writable_file(&self, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        Ok(self.file(file_name))
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_dir_wins() {
        let storage = DataStorage::resolve(lookup(&[(ENV_DATA_DIR, "/srv/wadash"), ("HOME", "/home/kiosk")]));
        assert_eq!(storage.root(), Path::new("/srv/wadash"));
        assert_eq!(storage.file("config.json"), Path::new("/srv/wadash/config.json"));
    }

    #[test]
    fn test_blank_explicit_dir_is_ignored() {
        let storage = DataStorage::resolve(lookup(&[(ENV_DATA_DIR, "  ")]));
        assert_eq!(storage.root(), Path::new(".").join(DIR_NAME));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_platform_dir() {
        let storage = DataStorage::resolve(lookup(&[("HOME", "/home/kiosk")]));
        assert_eq!(storage.root(), Path::new("/home/kiosk/.local/share/wadash"));
    }

    #[test]
    fn test_writable_file_creates_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DataStorage::at(temp_dir.path().join("nested"));

        assert!(!storage.root().exists());
        let path = storage.writable_file("config.json").unwrap();
        assert!(storage.root().is_dir());
        assert!(!path.exists());
    }
}
