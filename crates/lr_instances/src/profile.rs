use std::path::PathBuf;

use lr_core::{file_utils, JsonFileError, LauncherConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An offline player profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub uuid: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct ProfilesJson {
    current: Option<String>,
    #[serde(default)]
    profiles: Vec<Profile>,
}

/// `profiles.json`: every profile plus the one in use.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    json: ProfilesJson,
}

impl ProfileStore {
    /// Reads `profiles.json`, creating an empty one if missing.
    ///
    /// # Errors
    /// If the file can't be read, written or parsed.
    pub async fn load(config: &LauncherConfig) -> Result<Self, ProfileError> {
        let path = config.profiles_file();
        if !path.exists() {
            file_utils::write_json_file(&path, &ProfilesJson::default()).await?;
        }
        let json = file_utils::read_json_file(&path).await?;
        Ok(Self { path, json })
    }

    /// # Errors
    /// If the file can't be written.
    pub async fn save(&self) -> Result<(), ProfileError> {
        file_utils::write_json_file(&self.path, &self.json).await?;
        Ok(())
    }

    /// Adds a profile. A random UUID v4 is used if `uuid` is `None`.
    /// The first profile ever added becomes the current one.
    ///
    /// # Errors
    /// - username empty or containing whitespace
    /// - a profile with that username exists
    /// - `uuid` isn't a valid UUID
    pub fn add(&mut self, username: &str, uuid: Option<&str>) -> Result<&Profile, ProfileError> {
        if username.is_empty() || username.contains(char::is_whitespace) {
            return Err(ProfileError::InvalidUsername(username.to_owned()));
        }
        if self.find(username).is_some() {
            return Err(ProfileError::AlreadyExists(username.to_owned()));
        }
        let uuid = match uuid {
            Some(uuid) => uuid::Uuid::parse_str(uuid)
                .map_err(|_| ProfileError::InvalidUuid(uuid.to_owned()))?
                .to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        if self.json.current.is_none() {
            self.json.current = Some(username.to_owned());
        }
        self.json.profiles.push(Profile {
            username: username.to_owned(),
            uuid,
        });
        Ok(&self.json.profiles[self.json.profiles.len() - 1])
    }

    /// # Errors
    /// [`ProfileError::NotFound`] if there's no such profile.
    pub fn remove(&mut self, username: &str) -> Result<Profile, ProfileError> {
        let Some(idx) = self
            .json
            .profiles
            .iter()
            .position(|p| p.username == username)
        else {
            return Err(ProfileError::NotFound(username.to_owned()));
        };
        if self.json.current.as_deref() == Some(username) {
            self.json.current = None;
        }
        Ok(self.json.profiles.remove(idx))
    }

    /// # Errors
    /// [`ProfileError::NotFound`] if there's no such profile.
    pub fn set_current(&mut self, username: &str) -> Result<(), ProfileError> {
        if self.find(username).is_none() {
            return Err(ProfileError::NotFound(username.to_owned()));
        }
        self.json.current = Some(username.to_owned());
        Ok(())
    }

    /// # Errors
    /// [`ProfileError::NoneSelected`] if no profile is in use.
    pub fn current(&self) -> Result<&Profile, ProfileError> {
        self.json
            .current
            .as_deref()
            .and_then(|name| self.find(name))
            .ok_or(ProfileError::NoneSelected)
    }

    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        self.json.current.as_deref()
    }

    #[must_use]
    pub fn list(&self) -> &[Profile] {
        &self.json.profiles
    }

    fn find(&self, username: &str) -> Option<&Profile> {
        self.json.profiles.iter().find(|p| p.username == username)
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid username {0:?}: must be non-empty and contain no spaces")]
    InvalidUsername(String),
    #[error("invalid uuid {0:?}")]
    InvalidUuid(String),
    #[error("a profile named {0:?} already exists")]
    AlreadyExists(String),
    #[error("no profile named {0:?}")]
    NotFound(String),
    #[error("no profile in use, add one with `larchier profile add <username>`")]
    NoneSelected,
    #[error("couldn't access profiles.json: {0}")]
    Json(#[from] JsonFileError),
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

    #[tokio::test]
    async fn add_select_and_persist() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());

        let mut store = ProfileStore::load(&config).await.unwrap();
        assert!(matches!(store.current(), Err(ProfileError::NoneSelected)));

        let steve = store.add("Steve", None).unwrap().clone();
        assert!(uuid::Uuid::parse_str(&steve.uuid).is_ok());
        store
            .add("Alex", Some("0f2b5c8e-6a51-4d3c-9a8e-3b8f4e2d1c0a"))
            .unwrap();
        assert_eq!(store.current().unwrap().username, "Steve");

        store.set_current("Alex").unwrap();
        store.save().await.unwrap();

        let store = ProfileStore::load(&config).await.unwrap();
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.current().unwrap().username, "Alex");
        assert_eq!(store.list()[0], steve);
    }

    #[tokio::test]
    async fn rejects_bad_input() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::load(&config(tmp.path())).await.unwrap();

        store.add("Steve", None).unwrap();
        assert!(matches!(
            store.add("Steve", None),
            Err(ProfileError::AlreadyExists(_))
        ));
        assert!(matches!(
            store.add("Big Steve", None),
            Err(ProfileError::InvalidUsername(_))
        ));
        assert!(matches!(
            store.add("", None),
            Err(ProfileError::InvalidUsername(_))
        ));
        assert!(matches!(
            store.add("Alex", Some("not-a-uuid")),
            Err(ProfileError::InvalidUuid(_))
        ));
        assert!(matches!(
            store.set_current("Herobrine"),
            Err(ProfileError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn removing_current_clears_it() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::load(&config(tmp.path())).await.unwrap();
        store.add("Steve", None).unwrap();

        let removed = store.remove("Steve").unwrap();
        assert_eq!(removed.username, "Steve");
        assert_eq!(store.current_name(), None);
        assert!(matches!(
            store.remove("Steve"),
            Err(ProfileError::NotFound(_))
        ));
    }
}
