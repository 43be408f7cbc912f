use std::{collections::HashMap, path::PathBuf};

use lr_core::{
    json::{version::Argument, InstanceConfigJson, VersionDetails},
    Platform, LAUNCHER_NAME, LAUNCHER_VERSION_NAME,
};

use crate::{download::classpath_jars, InstancePaths, Profile};

use super::replace_placeholders;

/// Everything needed to put together the `java` command line
/// of one instance.
pub struct GameLauncher {
    pub platform: Platform,
    pub paths: InstancePaths,
    pub version_json: VersionDetails,
    pub profile: Profile,
    pub config_json: InstanceConfigJson,
    pub java_binary: PathBuf,
}

impl GameLauncher {
    /// The arguments passed to [`GameLauncher::java_binary`], in order:
    /// 1. `-Dfml.ignoreInvalidMinecraftCertificates=true`
    /// 2. the instance's extra Java args, then `-Xmx`
    /// 3. the version's JVM args (or the library path and classpath
    ///    for versions without any)
    /// 4. the main class
    /// 5. `--width`/`--height`
    /// 6. the version's game args (or the legacy `minecraftArguments`)
    #[must_use]
    pub fn build_arguments(&self) -> Vec<String> {
        let values = self.placeholder_values();

        let mut args = vec!["-Dfml.ignoreInvalidMinecraftCertificates=true".to_owned()];
        args.extend(self.config_json.java_args_split().map(ToOwned::to_owned));
        args.push(self.config_json.get_ram_argument());

        let arguments = self.version_json.arguments.as_ref();
        if let Some(jvm) = arguments.and_then(|n| n.jvm.as_ref()) {
            args.extend(self.expand(jvm, &values));
        } else {
            args.push(format!(
                "-Djava.library.path={}",
                self.paths.natives_dir.to_string_lossy()
            ));
            args.push("-cp".to_owned());
            args.push(self.classpath());
        }

        args.push(self.version_json.mainClass.clone());
        args.extend([
            "--width".to_owned(),
            self.config_json.width.to_string(),
            "--height".to_owned(),
            self.config_json.height.to_string(),
        ]);

        if let Some(game) = arguments.and_then(|n| n.game.as_ref()) {
            args.extend(self.expand(game, &values));
        } else if let Some(legacy) = &self.version_json.minecraftArguments {
            args.extend(
                legacy
                    .split_whitespace()
                    .map(|arg| replace_placeholders(arg, &values)),
            );
        }

        args
    }

    fn expand(&self, arguments: &[Argument], values: &HashMap<&str, String>) -> Vec<String> {
        arguments
            .iter()
            .flat_map(|arg| arg.values(&self.platform))
            .map(|arg| replace_placeholders(arg, values))
            .collect()
    }

    /// Every library jar on disk, then the client jar.
    #[must_use]
    pub fn classpath(&self) -> String {
        let mut jars = classpath_jars(
            &self.version_json.libraries,
            &self.paths.libraries_dir,
            &self.platform,
        );
        jars.push(self.paths.client_jar.clone());

        let separator = self.platform.classpath_separator().to_string();
        jars.iter()
            .map(|jar| jar.to_string_lossy())
            .collect::<Vec<_>>()
            .join(&separator)
    }

    fn placeholder_values(&self) -> HashMap<&'static str, String> {
        let path = |p: &std::path::Path| p.to_string_lossy().into_owned();

        // Old versions read their assets by name from the legacy tree.
        let legacy_assets = self.paths.legacy_assets_dir();
        let game_assets = if legacy_assets.is_dir() {
            path(&legacy_assets)
        } else {
            path(&self.paths.assets_dir)
        };

        HashMap::from([
            ("auth_player_name", self.profile.username.clone()),
            ("version_name", self.version_json.id.clone()),
            ("game_directory", path(&self.paths.root)),
            ("assets_root", path(&self.paths.assets_dir)),
            ("game_assets", game_assets),
            ("assets_index_name", self.version_json.assetIndex.id.clone()),
            ("auth_uuid", self.profile.uuid.clone()),
            ("auth_access_token", "''".to_owned()),
            ("auth_session", "''".to_owned()),
            ("clientid", uuid::Uuid::new_v4().to_string()),
            ("auth_xuid", "''".to_owned()),
            ("user_type", "''".to_owned()),
            (
                "version_type",
                self.version_json
                    .r#type
                    .clone()
                    .unwrap_or_else(|| "unknown".to_owned()),
            ),
            ("natives_directory", path(&self.paths.natives_dir)),
            ("launcher_name", LAUNCHER_NAME.to_owned()),
            ("launcher_version", LAUNCHER_VERSION_NAME.to_owned()),
            ("classpath", self.classpath()),
            (
                "classpath_separator",
                self.platform.classpath_separator().to_string(),
            ),
            ("library_directory", path(&self.paths.libraries_dir)),
            ("user_properties", "{}".to_owned()),
        ])
    }
}
