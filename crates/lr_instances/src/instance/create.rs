use std::path::PathBuf;

use lr_core::{
    info, json::InstanceConfigJson, json::VersionDetails, DownloadError, GameVersion, IntoIoError,
    IoError, LauncherConfig,
};
use lr_java_handler::JavaInstallError;
use thiserror::Error;

use crate::{
    instance_store::validate_instance_name, GameDownloader, InstanceEntry, InstanceError,
    InstancePaths, InstanceRegistry,
};

/// What to create. Only `name` and `version` are required.
#[derive(Debug, Clone)]
pub struct NewInstance {
    /// Name of the instance (for example: "my cool instance")
    pub name: String,
    /// Version of the game to download (for example: "1.21.1", "24w14a")
    pub version: String,
    /// An existing folder to install the game into.
    /// Defaults to `<launcher dir>/instances/<name>/`.
    pub game_path: Option<PathBuf>,
    /// An existing Java binary to launch the game with.
    /// If `None`, the right runtime is installed.
    pub java_binary: Option<PathBuf>,
    pub config: InstanceConfigJson,
}

impl NewInstance {
    #[must_use]
    pub fn new(name: String, version: String) -> Self {
        Self {
            name,
            version,
            game_path: None,
            java_binary: None,
            config: InstanceConfigJson::default(),
        }
    }
}

/// Creates a Minecraft instance.
///
/// Installs, in order: the Java runtime (unless the instance
/// brings its own binary), the client jar, libraries, natives,
/// the logging config and assets. Then it's added to `instances.json`.
///
/// Every download skips files already on disk, so creating
/// an instance in a folder that already has the game is cheap.
///
/// # Errors
/// - invalid name, or one already taken
/// - `game_path` or `java_binary` don't exist
/// - the version isn't in the version manifest
/// - any download or extraction failed
pub async fn create_instance(
    config: &LauncherConfig,
    request: NewInstance,
) -> Result<InstanceEntry, InstallError> {
    info!("Started creating instance.");
    validate_instance_name(&request.name)?;
    let mut registry = InstanceRegistry::load(config).await?;
    if registry.contains(&request.name) {
        return Err(InstanceError::AlreadyExists(request.name).into());
    }

    let game_path = if let Some(path) = request.game_path {
        if !path.is_dir() {
            return Err(InstanceError::GamePathNotFound(path).into());
        }
        path
    } else {
        let path = config.instances_dir().join(&request.name);
        tokio::fs::create_dir_all(&path).await.path(&path)?;
        path
    };
    if let Some(java_binary) = &request.java_binary {
        if !java_binary.is_file() {
            return Err(InstanceError::JavaBinaryNotFound(java_binary.clone()).into());
        }
    }

    let game_version = request.version.to_lowercase();
    info!("Fetching version data for {game_version}");
    let version_json = VersionDetails::download(config, &game_version).await?;

    if request.java_binary.is_none() {
        let runtime = lr_java_handler::select_runtime(&GameVersion::parse(&game_version), config);
        lr_java_handler::get_java_binary(config, &runtime).await?;
    }

    let paths = InstancePaths::new(&game_path, &version_json.id);
    let game_downloader = GameDownloader::new(config, paths, version_json);

    game_downloader.save_version_json().await?;
    game_downloader.download_jar().await?;
    let native_jars = game_downloader.download_libraries().await?;
    game_downloader.extract_natives(native_jars).await?;
    game_downloader.download_logging_config().await?;
    game_downloader.download_assets().await?;

    let entry = InstanceEntry {
        game_version,
        game_path,
        java_binary: request.java_binary,
        config: request.config,
    };
    registry.insert(request.name.clone(), entry.clone());
    registry.save().await?;

    info!("Finished creating instance: {}", request.name);
    Ok(entry)
}

const INSTALL_ERR_PREFIX: &str = "while creating instance:\n";

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("{INSTALL_ERR_PREFIX}{0}")]
    Instance(#[from] InstanceError),
    #[error("{INSTALL_ERR_PREFIX}{0}")]
    Download(#[from] DownloadError),
    #[error("{INSTALL_ERR_PREFIX}{0}")]
    JavaInstall(#[from] JavaInstallError),
    #[error("{INSTALL_ERR_PREFIX}{0}")]
    Io(#[from] IoError),
}

#[cfg(test)]
mod tests {
    use lr_core::{Arch, OsName, Platform};

    use super::*;

    fn config(dir: &std::path::Path) -> LauncherConfig {
        LauncherConfig::new(
            dir.to_owned(),
            Platform {
                os: OsName::Linux,
                arch: Arch::X64,
            },
        )
    }

    // Everything below fails before any network access.

    #[tokio::test]
    async fn rejects_bad_name() {
        let tmp = tempfile::tempdir().unwrap();
        let request = NewInstance::new("../escape".to_owned(), "1.20.4".to_owned());
        assert!(matches!(
            create_instance(&config(tmp.path()), request).await,
            Err(InstallError::Instance(InstanceError::InvalidName(_)))
        ));
    }

    #[tokio::test]
    async fn rejects_missing_game_path() {
        let tmp = tempfile::tempdir().unwrap();
        let mut request = NewInstance::new("survival".to_owned(), "1.20.4".to_owned());
        request.game_path = Some(tmp.path().join("nope"));
        assert!(matches!(
            create_instance(&config(tmp.path()), request).await,
            Err(InstallError::Instance(InstanceError::GamePathNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn rejects_missing_java_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let mut request = NewInstance::new("survival".to_owned(), "1.20.4".to_owned());
        request.java_binary = Some(tmp.path().join("java"));
        assert!(matches!(
            create_instance(&config(tmp.path()), request).await,
            Err(InstallError::Instance(InstanceError::JavaBinaryNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn rejects_duplicate_name() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let mut registry = InstanceRegistry::load(&config).await.unwrap();
        registry.insert(
            "survival".to_owned(),
            InstanceEntry {
                game_version: "1.20.4".to_owned(),
                game_path: tmp.path().to_owned(),
                java_binary: None,
                config: InstanceConfigJson::default(),
            },
        );
        registry.save().await.unwrap();

        let request = NewInstance::new("survival".to_owned(), "1.20.4".to_owned());
        assert!(matches!(
            create_instance(&config, request).await,
            Err(InstallError::Instance(InstanceError::AlreadyExists(_)))
        ));
    }
}
