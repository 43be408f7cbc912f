use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use lr_core::{
    file_utils, info, json::InstanceConfigJson, IntoIoError, IoError, JsonFileError,
    LauncherConfig,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One installed instance, as stored in `instances.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstanceEntry {
    pub game_version: String,
    /// The game folder (working directory of the game).
    pub game_path: PathBuf,
    /// A user-supplied Java binary. `None` means the managed
    /// runtime matching `game_version` is used.
    pub java_binary: Option<PathBuf>,
    pub config: InstanceConfigJson,
}

/// `instances.json`: instance name to [`InstanceEntry`].
#[derive(Debug)]
pub struct InstanceRegistry {
    path: PathBuf,
    instances: BTreeMap<String, InstanceEntry>,
}

impl InstanceRegistry {
    /// Reads `instances.json`, creating an empty one if missing.
    ///
    /// # Errors
    /// If the file can't be read, written or parsed.
    pub async fn load(config: &LauncherConfig) -> Result<Self, InstanceError> {
        let path = config.instances_file();
        if !path.exists() {
            file_utils::write_json_file(&path, &BTreeMap::<String, InstanceEntry>::new())
                .await?;
        }
        let instances = file_utils::read_json_file(&path).await?;
        Ok(Self { path, instances })
    }

    /// # Errors
    /// If the file can't be written.
    pub async fn save(&self) -> Result<(), InstanceError> {
        file_utils::write_json_file(&self.path, &self.instances).await?;
        Ok(())
    }

    /// # Errors
    /// [`InstanceError::NotFound`] if there's no such instance.
    pub fn get(&self, name: &str) -> Result<&InstanceEntry, InstanceError> {
        self.instances
            .get(name)
            .ok_or_else(|| InstanceError::NotFound(name.to_owned()))
    }

    /// # Errors
    /// [`InstanceError::NotFound`] if there's no such instance.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut InstanceEntry, InstanceError> {
        self.instances
            .get_mut(name)
            .ok_or_else(|| InstanceError::NotFound(name.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// Adds or replaces an instance. Call [`InstanceRegistry::save`] afterwards.
    pub fn insert(&mut self, name: String, entry: InstanceEntry) {
        self.instances.insert(name, entry);
    }

    /// # Errors
    /// [`InstanceError::NotFound`] if there's no such instance.
    pub fn remove(&mut self, name: &str) -> Result<InstanceEntry, InstanceError> {
        self.instances
            .remove(name)
            .ok_or_else(|| InstanceError::NotFound(name.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstanceEntry)> {
        self.instances.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Rejects names that can't safely be used as a folder name.
///
/// # Errors
/// [`InstanceError::InvalidName`] for empty names, names with
/// path separators or characters Windows doesn't allow.
pub fn validate_instance_name(name: &str) -> Result<(), InstanceError> {
    const FORBIDDEN: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*', '\0'];

    let is_invalid = name.trim().is_empty()
        || name != name.trim()
        || name == "."
        || name == ".."
        || name.contains(FORBIDDEN);
    if is_invalid {
        return Err(InstanceError::InvalidName(name.to_owned()));
    }
    Ok(())
}

/// Removes an instance from the registry, and with `delete_data`
/// also deletes its game folder.
///
/// # Errors
/// - no such instance
/// - registry or game folder couldn't be written
pub async fn remove_instance(
    config: &LauncherConfig,
    name: &str,
    delete_data: bool,
) -> Result<InstanceEntry, InstanceError> {
    let mut registry = InstanceRegistry::load(config).await?;
    let entry = registry.remove(name)?;
    registry.save().await?;

    if delete_data && entry.game_path.exists() {
        info!("Deleting {:?}", entry.game_path);
        delete_dir(&entry.game_path).await?;
    }
    Ok(entry)
}

async fn delete_dir(path: &Path) -> Result<(), IoError> {
    tokio::fs::remove_dir_all(path).await.path(path)
}

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("invalid instance name {0:?}: must be a non-empty folder name")]
    InvalidName(String),
    #[error("an instance named {0:?} already exists")]
    AlreadyExists(String),
    #[error("no instance named {0:?}")]
    NotFound(String),
    #[error("game path {0:?} does not exist")]
    GamePathNotFound(PathBuf),
    #[error("java binary {0:?} does not exist")]
    JavaBinaryNotFound(PathBuf),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("couldn't read instances.json: {0}")]
    Json(#[from] JsonFileError),
}

#[cfg(test)]
mod tests {
    use lr_core::{Arch, OsName, Platform};

    use super::*;

    fn config(dir: &Path) -> LauncherConfig {
        LauncherConfig::new(
            dir.to_owned(),
            Platform {
                os: OsName::Linux,
                arch: Arch::X64,
            },
        )
    }

    fn entry(dir: &Path) -> InstanceEntry {
        InstanceEntry {
            game_version: "1.20.4".to_owned(),
            game_path: dir.join("instances").join("survival"),
            java_binary: None,
            config: InstanceConfigJson::default(),
        }
    }

    #[test]
    fn instance_names() {
        assert!(validate_instance_name("survival").is_ok());
        assert!(validate_instance_name("my cool instance").is_ok());
        for bad in ["", "   ", " padded", "..", "a/b", "a\\b", "what?"] {
            assert!(
                matches!(validate_instance_name(bad), Err(InstanceError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn registry_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());

        let mut registry = InstanceRegistry::load(&config).await.unwrap();
        assert!(registry.is_empty());
        assert!(config.instances_file().is_file());

        registry.insert("survival".to_owned(), entry(tmp.path()));
        registry.save().await.unwrap();

        let mut registry = InstanceRegistry::load(&config).await.unwrap();
        assert_eq!(registry.get("survival").unwrap(), &entry(tmp.path()));
        registry.get_mut("survival").unwrap().config.width = 1920;
        registry.save().await.unwrap();

        let registry = InstanceRegistry::load(&config).await.unwrap();
        assert_eq!(registry.get("survival").unwrap().config.width, 1920);
        assert!(matches!(
            registry.get("creative"),
            Err(InstanceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn remove_with_data() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let entry = entry(tmp.path());
        std::fs::create_dir_all(entry.game_path.join("saves")).unwrap();

        let mut registry = InstanceRegistry::load(&config).await.unwrap();
        registry.insert("survival".to_owned(), entry.clone());
        registry.save().await.unwrap();

        remove_instance(&config, "survival", true).await.unwrap();
        assert!(!entry.game_path.exists());
        assert!(!InstanceRegistry::load(&config)
            .await
            .unwrap()
            .contains("survival"));
        assert!(matches!(
            remove_instance(&config, "survival", false).await,
            Err(InstanceError::NotFound(_))
        ));
    }
}
