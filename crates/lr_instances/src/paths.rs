use std::path::{Path, PathBuf};

/// Where everything of one instance lives on disk.
///
/// Every path is derived from the game folder and the version id alone:
/// ```txt
/// <root>/
///     versions/<id>/<id>.jar
///     versions/<id>/<id>.json
///     versions/<id>/client.txt
///     versions/<id>/natives/
///     libraries/
///     assets/
///         indexes/<asset index>.json
///         objects/<hash[0..2]>/<hash>
///         log_configs/
///         virtual/legacy/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancePaths {
    pub root: PathBuf,
    pub version_dir: PathBuf,
    pub client_jar: PathBuf,
    pub version_json: PathBuf,
    pub client_mappings: PathBuf,
    pub natives_dir: PathBuf,
    pub libraries_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl InstancePaths {
    #[must_use]
    pub fn new(root: &Path, version_id: &str) -> Self {
        let version_dir = root.join("versions").join(version_id);
        Self {
            root: root.to_owned(),
            client_jar: version_dir.join(format!("{version_id}.jar")),
            version_json: version_dir.join(format!("{version_id}.json")),
            client_mappings: version_dir.join("client.txt"),
            natives_dir: version_dir.join("natives"),
            version_dir,
            libraries_dir: root.join("libraries"),
            assets_dir: root.join("assets"),
        }
    }

    #[must_use]
    pub fn asset_index(&self, index_id: &str) -> PathBuf {
        self.assets_dir
            .join("indexes")
            .join(format!("{index_id}.json"))
    }

    #[must_use]
    pub fn log_configs_dir(&self) -> PathBuf {
        self.assets_dir.join("log_configs")
    }

    #[must_use]
    pub fn legacy_assets_dir(&self) -> PathBuf {
        self.assets_dir.join("virtual").join("legacy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let root = Path::new("game");
        let paths = InstancePaths::new(root, "1.20.4");
        assert_eq!(
            paths.client_jar,
            root.join("versions").join("1.20.4").join("1.20.4.jar")
        );
        assert_eq!(
            paths.natives_dir,
            root.join("versions").join("1.20.4").join("natives")
        );
        assert_eq!(
            paths.asset_index("12"),
            root.join("assets").join("indexes").join("12.json")
        );
        assert_eq!(
            paths.legacy_assets_dir(),
            root.join("assets").join("virtual").join("legacy")
        );
    }
}
