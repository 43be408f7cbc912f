use std::{
    io::{stdout, Write},
    path::PathBuf,
};

use colored::Colorize;
use lr_core::{
    info,
    json::{
        instance_config::{is_valid_memory, parse_resolution},
        InstanceConfigJson, Manifest,
    },
    JsonDownloadError, LauncherConfig,
};
use lr_instances::{
    GameLaunchError, InstallError, InstanceError, InstanceRegistry, NewInstance, ProfileError,
    ProfileStore,
};
use thiserror::Error;

/// Launch settings shared by `add` and `config`.
#[derive(clap::Args, Debug, Default)]
pub struct Settings {
    /// Window size, WIDTHxHEIGHT (eg. 1280x720)
    #[arg(long)]
    pub resolution: Option<String>,
    /// Maximum memory, eg. 2G or 4096M
    #[arg(long)]
    pub memory: Option<String>,
    /// Extra Java arguments, as one quoted string
    #[arg(long, allow_hyphen_values = true)]
    pub java_args: Option<String>,
}

impl Settings {
    fn is_empty(&self) -> bool {
        self.resolution.is_none() && self.memory.is_none() && self.java_args.is_none()
    }

    /// Validates everything before changing anything.
    fn apply(&self, config: &mut InstanceConfigJson) -> Result<(), CliError> {
        let resolution = match &self.resolution {
            Some(resolution) => Some(
                parse_resolution(resolution)
                    .ok_or_else(|| CliError::InvalidResolution(resolution.clone()))?,
            ),
            None => None,
        };
        if let Some(memory) = &self.memory {
            if !is_valid_memory(memory) {
                return Err(CliError::InvalidMemory(memory.clone()));
            }
        }

        if let Some((width, height)) = resolution {
            config.width = width;
            config.height = height;
        }
        if let Some(memory) = &self.memory {
            config.max_memory.clone_from(memory);
        }
        if let Some(java_args) = &self.java_args {
            config.java_args.clone_from(java_args);
        }
        Ok(())
    }
}

pub async fn cmd_add(
    config: &LauncherConfig,
    name: String,
    version: String,
    game_path: Option<PathBuf>,
    java_binary: Option<PathBuf>,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut request = NewInstance::new(name, version);
    request.game_path = game_path;
    request.java_binary = java_binary;
    settings.apply(&mut request.config)?;

    let name = request.name.clone();
    let entry = lr_instances::create_instance(config, request).await?;
    info!(
        "Created instance {name} ({}) at {:?}",
        entry.game_version, entry.game_path
    );
    Ok(())
}

pub async fn cmd_launch(config: &LauncherConfig, name: &str) -> Result<(), CliError> {
    let code = lr_instances::launch(config, name).await?;
    println!("{} exit code: {}", "exited!".bold(), code.to_string().bold());
    Ok(())
}

pub async fn cmd_config(
    config: &LauncherConfig,
    name: &str,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut registry = InstanceRegistry::load(config).await?;
    let entry = registry.get_mut(name)?;

    if !settings.is_empty() {
        settings.apply(&mut entry.config)?;
        let updated = entry.config.clone();
        registry.save().await?;
        info!("Updated config of {name}");
        print_config(&updated);
    } else {
        print_config(&entry.config);
    }
    Ok(())
}

fn print_config(config: &InstanceConfigJson) {
    println!("{}  {}", "resolution:".bold(), config.resolution());
    println!("{}      {}", "memory:".bold(), config.max_memory);
    println!("{}   {}", "java args:".bold(), config.java_args);
}

pub async fn cmd_profile_add(
    config: &LauncherConfig,
    username: &str,
    uuid: Option<&str>,
) -> Result<(), CliError> {
    let mut profiles = ProfileStore::load(config).await?;
    let uuid = profiles.add(username, uuid)?.uuid.clone();
    profiles.save().await?;
    info!("Added profile {username} ({uuid})");
    Ok(())
}

pub async fn cmd_profile_remove(config: &LauncherConfig, username: &str) -> Result<(), CliError> {
    let mut profiles = ProfileStore::load(config).await?;
    profiles.remove(username)?;
    profiles.save().await?;
    info!("Removed profile {username}");
    Ok(())
}

pub async fn cmd_profile_use(config: &LauncherConfig, username: &str) -> Result<(), CliError> {
    let mut profiles = ProfileStore::load(config).await?;
    profiles.set_current(username)?;
    profiles.save().await?;
    info!("Now using profile {username}");
    Ok(())
}

pub async fn cmd_profile_list(config: &LauncherConfig) -> Result<(), CliError> {
    let profiles = ProfileStore::load(config).await?;
    let current = profiles.current_name();

    let mut stdout = stdout().lock();
    for profile in profiles.list() {
        if Some(profile.username.as_str()) == current {
            _ = writeln!(
                stdout,
                "{} {}  {}",
                "*".green(),
                profile.username.bold(),
                profile.uuid
            );
        } else {
            _ = writeln!(stdout, "  {}  {}", profile.username, profile.uuid);
        }
    }
    Ok(())
}

pub async fn cmd_remove(
    config: &LauncherConfig,
    name: &str,
    delete_data: bool,
) -> Result<(), CliError> {
    lr_instances::remove_instance(config, name, delete_data).await?;
    info!("Removed instance {name}");
    Ok(())
}

pub async fn cmd_list_instances(config: &LauncherConfig) -> Result<(), CliError> {
    let registry = InstanceRegistry::load(config).await?;

    let mut stdout = stdout().lock();
    for (name, entry) in registry.iter() {
        _ = writeln!(stdout, "{}  {}", name.bold(), entry.game_version);
    }
    Ok(())
}

pub async fn cmd_list_available_versions(
    config: &LauncherConfig,
    version_type: Option<&str>,
) -> Result<(), CliError> {
    let versions = lr_instances::list_versions(config, version_type).await?;

    let mut stdout = stdout().lock();
    for version in versions {
        _ = writeln!(stdout, "{version}");
    }
    Ok(())
}

pub async fn cmd_latest_versions(config: &LauncherConfig) -> Result<(), CliError> {
    let manifest = Manifest::download(config).await?;

    if let Some(release) = manifest.get_latest_release() {
        println!("{}  {}", "release:".bold(), release.id);
    }
    if let Some(snapshot) = manifest.get_latest_snapshot() {
        println!("{} {}", "snapshot:".bold(), snapshot.id);
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid resolution {0:?}, expected WIDTHxHEIGHT (eg. 1280x720)")]
    InvalidResolution(String),
    #[error("invalid memory {0:?}, expected a size like 2G or 4096M")]
    InvalidMemory(String),
    #[error(transparent)]
    Install(#[from] InstallError),
    #[error(transparent)]
    Launch(#[from] GameLaunchError),
    #[error(transparent)]
    Instance(#[from] InstanceError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("could not list versions: {0}")]
    Versions(#[from] JsonDownloadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_apply_all_or_nothing() {
        let mut config = InstanceConfigJson::default();

        let bad = Settings {
            resolution: Some("1280x720".to_owned()),
            memory: Some("lots".to_owned()),
            java_args: None,
        };
        assert!(matches!(
            bad.apply(&mut config),
            Err(CliError::InvalidMemory(_))
        ));
        assert_eq!(config, InstanceConfigJson::default());

        let good = Settings {
            resolution: Some("1280x720".to_owned()),
            memory: Some("4G".to_owned()),
            java_args: Some("-XX:+UseZGC".to_owned()),
        };
        good.apply(&mut config).unwrap();
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.max_memory, "4G");
        assert_eq!(config.java_args, "-XX:+UseZGC");

        let bad = Settings {
            resolution: Some("wide".to_owned()),
            ..Settings::default()
        };
        assert!(matches!(
            bad.apply(&mut config),
            Err(CliError::InvalidResolution(_))
        ));
    }
}
