//! # A module for creating, managing and running Minecraft client instances
//!
//! This module contains functions to:
//! - Create and delete an instance
//! - Launch the instance
//! - Read logs
//! - List versions available for download
//! - Manage offline profiles
//!
//! # A note about natives
//! Natives are platform-specific libraries that Minecraft uses
//! to interface with the operating system. They come in two forms:
//! - `natives: *` - part of the main library, with a separate
//!   classifier jar per OS (sometimes per architecture).
//! - `name: *-natives-*` - a separate library, gated by rules,
//!   whose jar is the native jar itself.
//!
//! Both kinds of jar get their shared libraries (`.dll`, `.so`,
//! `.dylib`, `.jnilib`) copied flat into `versions/<id>/natives/`.

mod download;
mod instance;
mod instance_store;
mod paths;
mod profile;

pub use download::{classpath_jars, GameDownloader};
pub use instance::create::{create_instance, InstallError, NewInstance};
pub use instance::launch::{launch, replace_placeholders, GameLaunchError, GameLauncher};
pub use instance::list_versions::list_versions;
pub use instance::read_log::run_game;
pub use instance_store::{
    remove_instance, validate_instance_name, InstanceEntry, InstanceError, InstanceRegistry,
};
pub use paths::InstancePaths;
pub use profile::{Profile, ProfileError, ProfileStore};
