//! Package manager detection

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Package managers that can install and build the measured project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Yarn,
    Pnpm,
    Bun,
    Npm,
}

impl PackageManager {
    /// Detect the package manager from lockfiles in `directory`.
    ///
    /// Checked in order: `yarn.lock`, `pnpm-lock.yaml`, `bun.lockb`. Falls back to npm.
    pub fn detect(directory: &Path) -> Self {
        if directory.join("yarn.lock").is_file() {
            PackageManager::Yarn
        } else if directory.join("pnpm-lock.yaml").is_file() {
            PackageManager::Pnpm
        } else if directory.join("bun.lockb").is_file() {
            PackageManager::Bun
        } else {
            PackageManager::Npm
        }
    }

    /// Executable name
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
            PackageManager::Npm => "npm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl FromStr for PackageManager {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            "bun" => Ok(PackageManager::Bun),
            "npm" => Ok(PackageManager::Npm),
            other => Err(Error::Other(format!(
                "Unsupported package manager '{}'. Expected one of: yarn, pnpm, bun, npm",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detect_defaults_to_npm() {
        let dir = TempDir::new().unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Npm);
    }

    #[test]
    fn test_detect_lockfiles() {
        let cases = [
            ("yarn.lock", PackageManager::Yarn),
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("bun.lockb", PackageManager::Bun),
            ("package-lock.json", PackageManager::Npm),
        ];

        for (lockfile, expected) in cases {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join(lockfile), "").unwrap();
            assert_eq!(PackageManager::detect(dir.path()), expected, "{}", lockfile);
        }
    }

    #[test]
    fn test_detect_prefers_yarn() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        fs::write(dir.path().join("yarn.lock"), "").unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Yarn);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("pnpm".parse::<PackageManager>().unwrap(), PackageManager::Pnpm);
        assert_eq!(" Yarn ".parse::<PackageManager>().unwrap(), PackageManager::Yarn);
        assert!("cargo".parse::<PackageManager>().is_err());
        assert_eq!(PackageManager::Bun.to_string(), "bun");
    }
}
