use std::path::PathBuf;

use lr_core::{
    file_utils, info,
    json::{asset_index::legacy_asset_path, AssetIndexMap},
    DownloadError, GameVersion, IoError,
};

use super::GameDownloader;

impl GameDownloader<'_> {
    /// Downloads the asset index and then every asset in it.
    ///
    /// Old versions (and indexes marked `virtual`) get their assets
    /// laid out by logical path under `assets/virtual/legacy/`,
    /// everything else goes to the hash-sharded `assets/objects/`.
    pub async fn download_assets(&self) -> Result<(), DownloadError> {
        info!("Downloading assets.");
        let index_info = &self.version_json.assetIndex;
        let index_path = self.paths.asset_index(&index_info.id);
        file_utils::download_file_to_path(&index_info.url, &index_path).await?;
        let index: AssetIndexMap = file_utils::read_json_file(&index_path).await?;

        let is_legacy =
            index.r#virtual || GameVersion::parse(&self.version_json.id).uses_legacy_assets();
        if is_legacy {
            info!("Using legacy asset layout");
        }

        let jobs = asset_jobs(
            &index,
            is_legacy,
            &self.config.assets_url,
            &self.paths.assets_dir,
        )?;

        let bar = indicatif::ProgressBar::new(jobs.len() as u64);
        let fetched = file_utils::fetch_all(jobs, &|| bar.inc(1)).await?;
        bar.finish_and_clear();
        info!("Downloaded {fetched} new assets");
        Ok(())
    }
}

/// `(url, destination)` for every object of an asset index.
fn asset_jobs(
    index: &AssetIndexMap,
    is_legacy: bool,
    assets_url: &str,
    assets_dir: &std::path::Path,
) -> Result<Vec<(String, PathBuf)>, DownloadError> {
    index
        .objects
        .iter()
        .map(|(name, object)| {
            let invalid_hash = || DownloadError::InvalidAssetHash {
                name: name.clone(),
                hash: object.hash.clone(),
            };
            let url = object.url(assets_url).ok_or_else(invalid_hash)?;
            let relative = if is_legacy {
                legacy_asset_path(name).ok_or_else(|| IoError::DirEscapeAttack(name.clone()))?
            } else {
                object.object_path().ok_or_else(invalid_hash)?
            };
            Ok((url, assets_dir.join(relative)))
        })
        .collect()
}
