//! Picks the Java runtime a Minecraft version needs, and installs it.
//!
//! Runtimes live in `<launcher dir>/java/<major>/`, one per major version,
//! and are shared by every instance.

use std::path::{Path, PathBuf};

use lr_core::{
    archive, file_utils, info, ArchiveError, DownloadFileError, GameVersion, IntoIoError, IoError,
    LauncherConfig, OsName,
};
use thiserror::Error;

mod java_list;

pub use java_list::{ArchiveKind, JavaVersion};

/// Snapshot thresholds, newest first.
const SNAPSHOT_THRESHOLDS: &[(&str, JavaVersion)] = &[
    ("24w14a", JavaVersion::Java21),
    ("22w03a", JavaVersion::Java17),
    ("21w19a", JavaVersion::Java16),
];

/// Release thresholds, newest first.
const RELEASE_THRESHOLDS: &[(&str, JavaVersion)] = &[
    ("1.20.5-pre1", JavaVersion::Java21),
    ("1.18-pre2", JavaVersion::Java17),
    ("1.18-pre1", JavaVersion::Java16),
];

/// The runtime chosen for a game version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSpec {
    pub version: JavaVersion,
    pub download_url: String,
    pub archive_kind: ArchiveKind,
}

impl RuntimeSpec {
    #[must_use]
    pub fn new(version: JavaVersion, config: &LauncherConfig) -> Self {
        Self {
            version,
            download_url: version.download_url(&config.platform),
            archive_kind: ArchiveKind::for_os(config.platform.os),
        }
    }

    #[must_use]
    pub fn major_version(&self) -> u32 {
        self.version.major()
    }
}

/// The Java version needed to run `game_version`.
///
/// Snapshots are only compared with snapshot thresholds, releases
/// with release thresholds. Anything older than every threshold
/// runs on Java 8.
#[must_use]
pub fn select_java_version(game_version: &GameVersion) -> JavaVersion {
    let thresholds = if game_version.is_snapshot() {
        SNAPSHOT_THRESHOLDS
    } else {
        RELEASE_THRESHOLDS
    };

    thresholds
        .iter()
        .find(|(threshold, _)| game_version.is_at_least(&GameVersion::parse(threshold)))
        .map_or(JavaVersion::Java8, |(_, java)| *java)
}

/// [`select_java_version`] plus where to download it on this platform.
#[must_use]
pub fn select_runtime(game_version: &GameVersion, config: &LauncherConfig) -> RuntimeSpec {
    RuntimeSpec::new(select_java_version(game_version), config)
}

/// Returns the path to the `java` binary of a runtime,
/// installing the runtime first if needed.
///
/// # Errors
/// If the Java installation fails, or the installed
/// runtime has no recognizable `java` binary.
pub async fn get_java_binary(
    config: &LauncherConfig,
    runtime: &RuntimeSpec,
) -> Result<PathBuf, JavaInstallError> {
    let java_dir = runtime_dir(config, runtime.version);
    let is_incomplete_install = java_dir.join(LOCK_FILE).exists();

    if !java_dir.exists() || is_incomplete_install {
        info!("Installing Java: {}", runtime.version);
        install_java(config, runtime, &java_dir).await?;
        info!("Finished installing Java {}", runtime.version);
    } else {
        info!(
            "Java {} already installed, skipping download",
            runtime.major_version()
        );
    }

    find_java_binary(&java_dir, config.platform.os)
}

/// `<launcher dir>/java/<major>`
#[must_use]
pub fn runtime_dir(config: &LauncherConfig, version: JavaVersion) -> PathBuf {
    config.java_dir().join(version.major().to_string())
}

const LOCK_FILE: &str = "install.lock";

async fn install_java(
    config: &LauncherConfig,
    runtime: &RuntimeSpec,
    java_dir: &Path,
) -> Result<(), JavaInstallError> {
    if java_dir.exists() {
        tokio::fs::remove_dir_all(java_dir).await.path(java_dir)?;
    }

    let archive_path = config.java_dir().join(format!(
        "jdk-{}.{}",
        runtime.major_version(),
        runtime.archive_kind.extension()
    ));
    info!("Downloading {}", runtime.download_url);
    file_utils::download_file_to_path(&runtime.download_url, &archive_path).await?;

    tokio::fs::create_dir_all(java_dir).await.path(java_dir)?;
    let lock_file = java_dir.join(LOCK_FILE);
    tokio::fs::write(
        &lock_file,
        "If you see this, java hasn't finished installing.",
    )
    .await
    .path(&lock_file)?;

    info!("Extracting {archive_path:?}");
    let kind = runtime.archive_kind;
    let (archive, dest) = (archive_path.clone(), java_dir.to_owned());
    let extracted = tokio::task::spawn_blocking(move || match kind {
        ArchiveKind::Zip => archive::extract_zip(&archive, &dest, true),
        ArchiveKind::TarGz => archive::extract_tar_gz(&archive, &dest),
    })
    .await;
    if !matches!(extracted, Ok(Ok(()))) {
        // A bad archive would otherwise be reused by the next attempt.
        _ = tokio::fs::remove_file(&archive_path).await;
    }
    extracted??;

    tokio::fs::remove_file(&archive_path)
        .await
        .path(&archive_path)?;
    tokio::fs::remove_file(&lock_file).await.path(&lock_file)?;
    Ok(())
}

/// Looks for the `java` executable inside an installed runtime.
///
/// # Errors
/// [`JavaInstallError::NoJavaBinFound`] if none of the
/// usual locations has one.
pub fn find_java_binary(java_dir: &Path, os: OsName) -> Result<PathBuf, JavaInstallError> {
    let candidates: &[&str] = match os {
        OsName::Windows => &["bin/javaw.exe", "bin/java.exe"],
        OsName::Osx | OsName::Linux => &["bin/java", "Contents/Home/bin/java"],
    };

    candidates
        .iter()
        .map(|candidate| {
            candidate
                .split('/')
                .fold(java_dir.to_owned(), |path, part| path.join(part))
        })
        .find(|path| path.is_file())
        .ok_or_else(|| JavaInstallError::NoJavaBinFound(java_dir.to_owned()))
}

#[derive(Debug, Error)]
pub enum JavaInstallError {
    #[error("couldn't install java: {0}")]
    Download(#[from] DownloadFileError),
    #[error("couldn't install java: {0}")]
    Archive(#[from] ArchiveError),
    #[error("couldn't install java: {0}")]
    Io(#[from] IoError),
    #[error("couldn't find java binary in {0:?}")]
    NoJavaBinFound(PathBuf),
    #[error("couldn't install java: extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
