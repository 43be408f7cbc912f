use serde::Deserialize;

use crate::{file_utils, JsonDownloadError, LauncherConfig};

/// An official Minecraft version manifest
/// (list of all versions and their download links)
#[derive(Deserialize, Clone, Debug)]
pub struct Manifest {
    latest: Latest,
    pub versions: Vec<Version>,
}

impl Manifest {
    /// Downloads the manifest from [`LauncherConfig::manifest_url`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be downloaded or parsed into JSON.
    pub async fn download(config: &LauncherConfig) -> Result<Manifest, JsonDownloadError> {
        file_utils::download_file_to_json(&config.manifest_url).await
    }

    /// Looks up a version by its name.
    /// This searches for an *exact match*.
    #[must_use]
    pub fn find_name(&self, name: &str) -> Option<&Version> {
        self.versions.iter().find(|n| n.id == name)
    }

    /// Gets the latest stable release
    ///
    /// This only returns a `None` if the .latest field's
    /// data is *wrong* (impossible normally, if you just
    /// [`Manifest::download`] it).
    #[must_use]
    pub fn get_latest_release(&self) -> Option<&Version> {
        self.find_name(&self.latest.release)
    }

    /// Gets the latest snapshot (experimental) release.
    #[must_use]
    pub fn get_latest_snapshot(&self) -> Option<&Version> {
        self.find_name(&self.latest.snapshot)
    }

    /// Versions of one type (`release`, `snapshot`, `old_beta`, `old_alpha`),
    /// newest first. `None` lists everything.
    pub fn versions_of_type<'a>(
        &'a self,
        version_type: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Version> + 'a {
        self.versions
            .iter()
            .filter(move |v| version_type.is_none_or(|t| v.r#type == t))
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Latest {
    pub release: String,
    pub snapshot: String,
}

#[allow(non_snake_case)]
#[derive(Deserialize, Clone, Debug)]
pub struct Version {
    pub id: String,
    pub r#type: String,
    pub url: String,
    pub time: Option<String>,
    pub releaseTime: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "latest": { "release": "1.20.4", "snapshot": "24w14potato" },
        "versions": [
            { "id": "24w14potato", "type": "snapshot", "url": "https://x/24w14potato.json" },
            { "id": "1.20.4", "type": "release", "url": "https://x/1.20.4.json" },
            { "id": "1.20.4-rc1", "type": "snapshot", "url": "https://x/1.20.4-rc1.json" },
            { "id": "b1.7.3", "type": "old_beta", "url": "https://x/b1.7.3.json" }
        ]
    }"#;

    #[test]
    fn lookups() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.get_latest_release().unwrap().id, "1.20.4");
        assert_eq!(manifest.get_latest_snapshot().unwrap().id, "24w14potato");
        assert_eq!(
            manifest.find_name("b1.7.3").unwrap().url,
            "https://x/b1.7.3.json"
        );
        assert!(manifest.find_name("1.20.5").is_none());
    }

    #[test]
    fn filter_by_type() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        let snapshots: Vec<&str> = manifest
            .versions_of_type(Some("snapshot"))
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(snapshots, ["24w14potato", "1.20.4-rc1"]);
        assert_eq!(manifest.versions_of_type(None).count(), 4);
    }
}
