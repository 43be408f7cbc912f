use std::path::PathBuf;

use thiserror::Error;

use crate::{file_utils::get_launcher_dir, IoError, Platform, PlatformError};

pub const MANIFEST_URL: &str = "https://launchermeta.mojang.com/mc/game/version_manifest_v2.json";
pub const ASSETS_URL: &str = "https://resources.download.minecraft.net";

/// Launcher-wide settings, built once at startup and
/// passed by reference to everything that needs them.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub launcher_dir: PathBuf,
    pub platform: Platform,
    pub manifest_url: String,
    /// Base URL of the asset object store, without trailing slash.
    pub assets_url: String,
}

impl LauncherConfig {
    /// Detects the platform and locates (creating if needed)
    /// the launcher directory.
    ///
    /// # Errors
    /// - unsupported OS or architecture
    /// - launcher directory couldn't be found or created
    pub fn load() -> Result<Self, ConfigError> {
        let platform = Platform::current()?;
        let launcher_dir = get_launcher_dir()?;
        Ok(Self::new(launcher_dir, platform))
    }

    #[must_use]
    pub fn new(launcher_dir: PathBuf, platform: Platform) -> Self {
        Self {
            launcher_dir,
            platform,
            manifest_url: MANIFEST_URL.to_owned(),
            assets_url: ASSETS_URL.to_owned(),
        }
    }

    /// Parent of every managed Java runtime (`java/<major>/`).
    #[must_use]
    pub fn java_dir(&self) -> PathBuf {
        self.launcher_dir.join("java")
    }

    /// Default parent of instance game folders.
    #[must_use]
    pub fn instances_dir(&self) -> PathBuf {
        self.launcher_dir.join("instances")
    }

    #[must_use]
    pub fn instances_file(&self) -> PathBuf {
        self.launcher_dir.join("instances.json")
    }

    #[must_use]
    pub fn profiles_file(&self) -> PathBuf {
        self.launcher_dir.join("profiles.json")
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Io(#[from] IoError),
}
