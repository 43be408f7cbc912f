use lr_core::{json::manifest::Manifest, JsonDownloadError, LauncherConfig};

/// Returns the ids of all available versions of the game, newest first.
///
/// `version_type` narrows it down to one type
/// (`release`, `snapshot`, `old_beta`, `old_alpha`).
///
/// # Errors
/// If the version manifest couldn't be downloaded or parsed.
pub async fn list_versions(
    config: &LauncherConfig,
    version_type: Option<&str>,
) -> Result<Vec<String>, JsonDownloadError> {
    let manifest = Manifest::download(config).await?;

    Ok(manifest
        .versions_of_type(version_type)
        .map(|n| n.id.clone())
        .collect())
}
