use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// `assets/indexes/<id>.json`: every asset of a version,
/// keyed by its logical path (eg. `minecraft/sounds/ambient/cave/cave1.ogg`).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssetIndexMap {
    /// Old indexes ask for assets to be laid out by logical path.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub r#virtual: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub map_to_resources: bool,
    pub objects: BTreeMap<String, AssetObject>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssetObject {
    pub hash: String,
    pub size: usize,
}

impl AssetObject {
    fn prefix(&self) -> Option<&str> {
        let prefix = self.hash.get(0..2)?;
        prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
            .then_some(prefix)
    }

    /// `objects/<hash[0..2]>/<hash>`, relative to the assets dir.
    ///
    /// `None` if the hash is too short or not plain hex.
    #[must_use]
    pub fn object_path(&self) -> Option<PathBuf> {
        if !self.hash.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        let prefix = self.prefix()?;
        Some(Path::new("objects").join(prefix).join(&self.hash))
    }

    /// `<base_url>/<hash[0..2]>/<hash>`
    #[must_use]
    pub fn url(&self, base_url: &str) -> Option<String> {
        let prefix = self.prefix()?;
        Some(format!(
            "{}/{prefix}/{}",
            base_url.trim_end_matches('/'),
            self.hash
        ))
    }
}

/// `virtual/legacy/<logical path>`, relative to the assets dir.
///
/// `None` if the logical path would leave that folder.
#[must_use]
pub fn legacy_asset_path(logical_path: &str) -> Option<PathBuf> {
    let relative: PathBuf = logical_path.split('/').filter(|p| !p.is_empty()).collect();
    let safe = relative.components().count() > 0
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    safe.then(|| Path::new("virtual").join("legacy").join(relative))
}
