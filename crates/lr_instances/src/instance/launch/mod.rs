use std::{collections::HashMap, sync::LazyLock};

use lr_core::{file_utils, info, json::VersionDetails, GameVersion, LauncherConfig};
use regex::Regex;

use crate::{instance::read_log::run_game, InstancePaths, InstanceRegistry, ProfileStore};

pub(super) mod error;
mod launcher;
pub use error::GameLaunchError;
pub use launcher::GameLauncher;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").unwrap());

/// Launches the specified instance as the profile in use
/// and waits for the game to exit, returning its exit code.
///
/// This auto downloads the required version of Java
/// if the instance has no Java binary of its own
/// and the runtime isn't installed yet.
///
/// # Errors
/// - instance not found, or no profile in use
/// - the game isn't installed (missing jar)
/// - Java couldn't be installed
/// - the `java` process couldn't be started
pub async fn launch(config: &LauncherConfig, instance_name: &str) -> Result<i32, GameLaunchError> {
    let registry = InstanceRegistry::load(config).await?;
    let entry = registry.get(instance_name)?.clone();
    let profiles = ProfileStore::load(config).await?;
    let profile = profiles.current()?.clone();

    let paths = InstancePaths::new(&entry.game_path, &entry.game_version);
    if !paths.client_jar.is_file() {
        return Err(GameLaunchError::GameNotInstalled(paths.client_jar));
    }

    let version_json = if paths.version_json.is_file() {
        file_utils::read_json_file(&paths.version_json).await?
    } else {
        info!("Fetching version data");
        VersionDetails::download(config, &entry.game_version).await?
    };

    let java_binary = if let Some(java_binary) = entry.java_binary.clone() {
        java_binary
    } else {
        let runtime =
            lr_java_handler::select_runtime(&GameVersion::parse(&entry.game_version), config);
        lr_java_handler::get_java_binary(config, &runtime).await?
    };
    info!("Java: {java_binary:?}");

    let launcher = GameLauncher {
        platform: config.platform,
        paths,
        version_json,
        profile,
        config_json: entry.config,
        java_binary,
    };
    let arguments = launcher.build_arguments();
    info!("Launching {instance_name} as {}", launcher.profile.username);

    run_game(&launcher.java_binary, &arguments, &launcher.paths.root).await
}

/// Substitutes every `${name}` in `argument` that `values` knows.
/// Unknown placeholders are kept as-is.
#[must_use]
pub fn replace_placeholders(argument: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(argument, |caps: &regex::Captures| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}
