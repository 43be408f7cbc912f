use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    file_utils, json::manifest::Manifest, rules, DownloadError, LauncherConfig, Platform,
};

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VersionDetails {
    /// The list of command line arguments.
    ///
    /// Used in new Minecraft versions, compared to minecraftArguments used in old versions.
    pub arguments: Option<Arguments>,
    /// An index/list of assets (music/sounds) to be downloaded.
    pub assetIndex: AssetIndex,
    /// Which version of the assets to be downloaded.
    pub assets: Option<String>,
    /// Where to download the client jar.
    pub downloads: Downloads,
    /// Name of the version.
    pub id: String,
    /// Version of java the official launcher would pick.
    pub javaVersion: Option<JavaVersion>,
    /// Library dependencies of the version that need to be downloaded.
    pub libraries: Vec<Library>,
    /// Details regarding console logging with log4j.
    pub logging: Option<Logging>,
    /// Which is the main class in the jar that has the main function.
    pub mainClass: String,
    /// The list of command line arguments.
    ///
    /// Used in old Minecraft versions, compared to arguments used in new versions.
    pub minecraftArguments: Option<String>,
    /// Type of version, such as old_alpha, snapshot or release.
    pub r#type: Option<String>,
}

impl VersionDetails {
    /// Looks `version` up in the version manifest
    /// and downloads its details.
    ///
    /// Manifest ids are lowercase, so `version` is lowercased first.
    ///
    /// # Errors
    /// - [`DownloadError::VersionNotFoundInManifest`] if the
    ///   manifest doesn't list `version`
    /// - the manifest or the details couldn't be downloaded or parsed
    pub async fn download(config: &LauncherConfig, version: &str) -> Result<Self, DownloadError> {
        let manifest = Manifest::download(config).await?;
        let version = version.to_lowercase();
        let Some(entry) = manifest.find_name(&version) else {
            return Err(DownloadError::VersionNotFoundInManifest(version));
        };
        Ok(file_utils::download_file_to_json(&entry.url).await?)
    }
}

/// `arguments` block of newer versions.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Arguments {
    pub game: Option<Vec<Argument>>,
    pub jvm: Option<Vec<Argument>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Argument {
    Plain(String),
    Conditional {
        #[serde(default)]
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Many(Vec<String>),
}

impl Argument {
    /// The argument's values, or nothing if its rules
    /// don't allow it on `platform`.
    #[must_use]
    pub fn values(&self, platform: &Platform) -> Vec<&str> {
        match self {
            Argument::Plain(arg) => vec![arg.as_str()],
            Argument::Conditional { rules, value } => {
                if !rules::evaluate(rules, platform) {
                    return Vec::new();
                }
                match value {
                    ArgumentValue::Single(arg) => vec![arg.as_str()],
                    ArgumentValue::Many(args) => args.iter().map(String::as_str).collect(),
                }
            }
        }
    }
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssetIndex {
    pub id: String,
    pub sha1: Option<String>,
    pub size: Option<usize>,
    pub totalSize: Option<usize>,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Downloads {
    pub client: Download,
    pub client_mappings: Option<Download>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Download {
    pub sha1: Option<String>,
    pub size: Option<usize>,
    pub url: String,
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JavaVersion {
    pub component: Option<String>,
    pub majorVersion: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Library {
    /// Maven coordinate, `group:name:version[:classifier]`.
    pub name: String,
    pub downloads: Option<LibraryDownloads>,
    /// Native jars of very old versions, listed outside `downloads`.
    pub classifiers: Option<BTreeMap<String, LibraryArtifact>>,
    /// OS name to native classifier, may contain `${arch}`.
    pub natives: Option<BTreeMap<String, String>>,
    pub rules: Option<Vec<Rule>>,
}

impl Library {
    /// Whether this library is needed on `platform`.
    /// Libraries without rules always are.
    #[must_use]
    pub fn is_allowed(&self, platform: &Platform) -> bool {
        self.rules
            .as_deref()
            .is_none_or(|rules| rules::evaluate(rules, platform))
    }

    #[must_use]
    pub fn artifact(&self) -> Option<&LibraryArtifact> {
        self.downloads.as_ref()?.artifact.as_ref()
    }

    /// Path of the main jar, relative to the `libraries` dir.
    ///
    /// Taken from the download info if present, otherwise
    /// derived from the maven coordinate.
    #[must_use]
    pub fn artifact_path(&self) -> Option<PathBuf> {
        match self.artifact().and_then(|a| a.path.as_deref()) {
            Some(path) => Some(relative_path(path)),
            None => library_path_from_name(&self.name),
        }
    }

    fn classifier_map(&self) -> Option<&BTreeMap<String, LibraryArtifact>> {
        self.downloads
            .as_ref()
            .and_then(|d| d.classifiers.as_ref())
            .or(self.classifiers.as_ref())
    }

    /// The native jar this library provides for `platform`, with its classifier.
    ///
    /// Only libraries with a `natives` map have one. The classifier named
    /// by that map wins (with `${arch}` replaced by `64`/`32`), then
    /// `natives-<os>`, then `natives-<os>-<bits>`.
    #[must_use]
    pub fn native_artifact(&self, platform: &Platform) -> Option<(String, &LibraryArtifact)> {
        let natives = self.natives.as_ref()?;
        let classifiers = self.classifier_map()?;

        let bits = platform.arch.bits();
        let candidates = [
            natives
                .get(platform.os.as_str())
                .map(|c| c.replace("${arch}", bits)),
            Some(platform.natives_classifier()),
            Some(format!("{}-{bits}", platform.natives_classifier())),
        ];

        candidates.into_iter().flatten().find_map(|classifier| {
            let artifact = classifiers.get(&classifier)?;
            Some((classifier, artifact))
        })
    }

    /// The maven coordinate without its version, eg. `org.lwjgl:lwjgl:natives-linux`.
    /// Two libraries with the same one are the same jar at different versions.
    #[must_use]
    pub fn name_without_version(&self) -> String {
        let mut parts: Vec<&str> = self.name.split(':').collect();
        if parts.len() > 2 {
            parts.remove(2);
        }
        parts.join(":")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LibraryDownloads {
    pub artifact: Option<LibraryArtifact>,
    pub classifiers: Option<BTreeMap<String, LibraryArtifact>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LibraryArtifact {
    pub path: Option<String>,
    pub sha1: Option<String>,
    pub size: Option<usize>,
    pub url: String,
}

impl LibraryArtifact {
    /// Path relative to the `libraries` dir, falling back to the
    /// last segment of the URL.
    #[must_use]
    pub fn relative_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(relative_path(path)),
            None => {
                let name = self.url.rsplit('/').next()?;
                (!name.is_empty()).then(|| PathBuf::from(name))
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

/// A platform condition on a library or argument.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Rule {
    pub action: RuleAction,
    pub os: Option<RuleOs>,
    /// Launcher features (demo mode, custom resolution, ...).
    /// Rules that mention any are never satisfied.
    pub features: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RuleOs {
    pub name: Option<String>,
    pub arch: Option<String>,
    /// Regex over the OS version. Not evaluated.
    pub version: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Logging {
    pub client: LoggingClient,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggingClient {
    pub argument: Option<String>,
    pub file: LoggingClientFile,
    pub r#type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggingClientFile {
    pub id: String,
    pub sha1: Option<String>,
    pub size: Option<usize>,
    pub url: String,
}

/// Turns a `/`-separated metadata path into a native path.
fn relative_path(path: &str) -> PathBuf {
    path.split('/').filter(|p| !p.is_empty()).collect()
}

/// `group:name:version[:classifier]` to
/// `group/as/dirs/name/version/name-version[-classifier].jar`.
#[must_use]
pub fn library_path_from_name(name: &str) -> Option<PathBuf> {
    let mut parts = name.split(':');
    let group = parts.next()?;
    let artifact = parts.next()?;
    let version = parts.next()?;
    let classifier = parts.next();

    let mut path: PathBuf = group.split('.').collect();
    path.push(artifact);
    path.push(version);
    path.push(match classifier {
        Some(classifier) => format!("{artifact}-{version}-{classifier}.jar"),
        None => format!("{artifact}-{version}.jar"),
    });
    Some(path)
}
