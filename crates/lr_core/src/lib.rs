//! Core utilities shared between the various crates.
//!
//! # Contains
//! - File and download utilities
//! - Archive extraction
//! - Error types
//! - JSON structs for the version manifest, version details and asset indexes
//! - Version comparison and library rule evaluation
//! - Logging macros

/// Zip and tar.gz extraction with rollback.
pub mod archive;
mod config;
mod error;
/// Common utilities for working with files.
pub mod file_utils;
/// JSON structs for the version manifest, version details, asset indexes
/// and per-instance launch settings.
pub mod json;
mod platform;
/// Logging macros.
pub mod print;
pub mod rules;
#[cfg(test)]
mod test_server;
pub mod version;

use std::sync::LazyLock;

pub use archive::ArchiveError;
pub use config::{ConfigError, LauncherConfig, ASSETS_URL, MANIFEST_URL};
pub use error::{
    DownloadError, DownloadFileError, IntoIoError, IoError, JsonDownloadError,
    JsonFileError,
};
pub use file_utils::RequestError;
use futures::StreamExt;
pub use platform::{Arch, OsName, Platform, PlatformError};
pub use print::{logger_finish, logger_init, LoggingState, LOGGER};
pub use version::{is_version_greater_or_equal, GameVersion};

#[doc(hidden)]
pub use colored;

/// To prevent spawning of terminal (windows only).
///
/// Takes in a &mut Command (both `tokio` or `std` will do).
#[macro_export]
macro_rules! no_window {
    ($cmd:expr) => {
        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            // 0x08000000 => CREATE_NO_WINDOW
            $cmd = $cmd.creation_flags(0x08000000);
        }
    };
}

pub static CLIENT: LazyLock<lr_reqwest::Client> = LazyLock::new(lr_reqwest::Client::new);

/// Perform multiple async tasks concurrently,
/// with at most 64 of them in flight at once.
pub async fn do_jobs<T, E>(
    results: impl Iterator<Item = impl std::future::Future<Output = Result<T, E>>>,
) -> Result<Vec<T>, E> {
    const JOBS: usize = 64;
    let mut tasks = futures::stream::FuturesUnordered::new();
    let mut outputs = Vec::new();

    for result in results {
        tasks.push(result);
        if tasks.len() >= JOBS {
            if let Some(task) = tasks.next().await {
                outputs.push(task?);
            }
        }
    }

    while let Some(task) = tasks.next().await {
        outputs.push(task?);
    }
    Ok(outputs)
}

pub const LAUNCHER_NAME: &str = "Larchier";
pub const LAUNCHER_VERSION_NAME: &str = "1.0.0-beta";
