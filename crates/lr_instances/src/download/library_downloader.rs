use std::path::{Path, PathBuf};

use lr_core::{
    archive, file_utils, info,
    json::version::{library_path_from_name, Library, LibraryArtifact},
    pt, DownloadError, Platform,
};

use super::GameDownloader;

impl GameDownloader<'_> {
    /// Downloads every library (and native jar) allowed on this platform.
    ///
    /// Returns the native jars, to be handed to
    /// [`GameDownloader::extract_natives`].
    pub async fn download_libraries(&self) -> Result<Vec<PathBuf>, DownloadError> {
        info!("Starting download of libraries.");
        let platform = &self.config.platform;

        let mut jobs = Vec::new();
        let mut native_jars = Vec::new();

        for library in &self.version_json.libraries {
            if !library.is_allowed(platform) {
                pt!("Skipping library {}", library.name);
                continue;
            }

            if let Some(artifact) = library.artifact() {
                let Some(relative) = library.artifact_path() else {
                    return Err(DownloadError::NoLibraryPath(library.name.clone()));
                };
                let path = file_utils::join_within(&self.paths.libraries_dir, &relative)?;
                if is_native_jar(&path) {
                    native_jars.push(path.clone());
                }
                jobs.push((artifact.url.clone(), path));
            }

            if let Some((classifier, artifact)) = library.native_artifact(platform) {
                let path = self.native_jar_path(library, &classifier, artifact)?;
                native_jars.push(path.clone());
                jobs.push((artifact.url.clone(), path));
            }
        }

        let bar = indicatif::ProgressBar::new(jobs.len() as u64);
        let fetched = file_utils::fetch_all(jobs, &|| bar.inc(1)).await?;
        bar.finish_and_clear();
        info!("Downloaded {fetched} new libraries");

        native_jars.sort();
        native_jars.dedup();
        Ok(native_jars)
    }

    fn native_jar_path(
        &self,
        library: &Library,
        classifier: &str,
        artifact: &LibraryArtifact,
    ) -> Result<PathBuf, DownloadError> {
        let relative = if artifact.path.is_some() {
            artifact.relative_path()
        } else {
            library_path_from_name(&format!("{}:{classifier}", library.name))
                .or_else(|| artifact.relative_path())
        };
        let Some(relative) = relative else {
            return Err(DownloadError::NoLibraryPath(library.name.clone()));
        };
        Ok(file_utils::join_within(&self.paths.libraries_dir, &relative)?)
    }

    /// Copies the shared libraries out of `native_jars`
    /// into `versions/<id>/natives/`.
    pub async fn extract_natives(&self, native_jars: Vec<PathBuf>) -> Result<(), DownloadError> {
        info!("Extracting natives");
        let natives_dir = self.paths.natives_dir.clone();
        let extensions = self.config.platform.os.shared_library_extensions();

        let count = tokio::task::spawn_blocking(move || {
            let mut count = 0;
            for jar in &native_jars {
                if !jar.is_file() {
                    continue;
                }
                pt!("{}", jar.file_name().unwrap_or_default().to_string_lossy());
                count += archive::extract_shared_libraries(jar, &natives_dir, extensions)?;
            }
            Ok::<usize, DownloadError>(count)
        })
        .await??;

        info!("Extracted {count} native libraries");
        Ok(())
    }
}

/// Natives shipped as their own library, eg. `lwjgl-3.3.1-natives-linux.jar`.
fn is_native_jar(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains("natives"))
}

/// Paths of the jars that belong on the classpath,
/// in metadata order, for the libraries allowed on `platform`.
///
/// A library listed twice at different versions only counts once
/// (the first listing wins). Jars missing from disk are left out.
#[must_use]
pub fn classpath_jars(
    libraries: &[Library],
    libraries_dir: &Path,
    platform: &Platform,
) -> Vec<PathBuf> {
    let mut seen = std::collections::HashSet::new();
    let mut jars = Vec::new();

    for library in libraries {
        if !library.is_allowed(platform) || library.artifact().is_none() {
            continue;
        }
        let Some(relative) = library.artifact_path() else {
            continue;
        };
        let Ok(path) = file_utils::join_within(libraries_dir, &relative) else {
            continue;
        };
        if !path.is_file() {
            continue;
        }
        if seen.insert(library.name_without_version()) {
            jars.push(path);
        }
    }
    jars
}
