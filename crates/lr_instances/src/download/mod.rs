mod assets;
mod library_downloader;

pub use library_downloader::classpath_jars;

use std::path::Path;

use lr_core::{file_utils, info, json::VersionDetails, pt, DownloadError, IoError, LauncherConfig};

use crate::InstancePaths;

/// A struct that helps download a Minecraft instance.
///
/// Every step skips files that are already on disk,
/// so running the whole sequence again only fills gaps.
/// The usual order is:
/// 1. [`GameDownloader::save_version_json`]
/// 2. [`GameDownloader::download_jar`]
/// 3. [`GameDownloader::download_libraries`]
/// 4. [`GameDownloader::extract_natives`]
/// 5. [`GameDownloader::download_logging_config`]
/// 6. [`GameDownloader::download_assets`]
///
/// # Example
/// Check the [`crate::create_instance`] function for an example.
pub struct GameDownloader<'a> {
    config: &'a LauncherConfig,
    pub paths: InstancePaths,
    pub version_json: VersionDetails,
}

impl<'a> GameDownloader<'a> {
    #[must_use]
    pub fn new(config: &'a LauncherConfig, paths: InstancePaths, version_json: VersionDetails) -> Self {
        Self {
            config,
            paths,
            version_json,
        }
    }

    /// Keeps a copy of the version details next to the jar,
    /// so launching doesn't need the network.
    pub async fn save_version_json(&self) -> Result<(), DownloadError> {
        file_utils::write_json_file(&self.paths.version_json, &self.version_json).await?;
        Ok(())
    }

    /// Downloads the client mappings (if the version has any)
    /// and then the game jar.
    pub async fn download_jar(&self) -> Result<(), DownloadError> {
        if let Some(mappings) = &self.version_json.downloads.client_mappings {
            pt!("Downloading client mappings");
            file_utils::download_file_to_path(&mappings.url, &self.paths.client_mappings).await?;
        } else {
            pt!("No client mappings found");
        }

        info!("Downloading game jar file.");
        file_utils::download_file_to_path(
            &self.version_json.downloads.client.url,
            &self.paths.client_jar,
        )
        .await?;
        Ok(())
    }

    /// Downloads the log4j config into `assets/log_configs/`.
    pub async fn download_logging_config(&self) -> Result<(), DownloadError> {
        if let Some(ref logging) = self.version_json.logging {
            info!("Downloading logging configuration.");
            let file_id = &logging.client.file.id;
            let Some(file_name) = Path::new(file_id).file_name() else {
                return Err(IoError::DirEscapeAttack(file_id.clone()).into());
            };
            let config_path = self.paths.log_configs_dir().join(file_name);
            file_utils::download_file_to_path(&logging.client.file.url, &config_path).await?;
        }
        Ok(())
    }
}
