use std::path::PathBuf;

use lr_core::{DownloadError, IoError, JsonFileError};
use lr_java_handler::JavaInstallError;
use thiserror::Error;

use crate::{InstanceError, ProfileError};

const GAME_ERR_PREFIX: &str = "while launching game:\n";

#[derive(Debug, Error)]
pub enum GameLaunchError {
    #[error("{GAME_ERR_PREFIX}{0}")]
    Io(#[from] IoError),
    #[error("{GAME_ERR_PREFIX}{0}")]
    DownloadError(#[from] DownloadError),
    #[error("{GAME_ERR_PREFIX}{0}")]
    JsonFile(#[from] JsonFileError),
    #[error("{GAME_ERR_PREFIX}{0}")]
    Instance(#[from] InstanceError),
    #[error("{GAME_ERR_PREFIX}{0}")]
    Profile(#[from] ProfileError),
    #[error("{GAME_ERR_PREFIX}{0}")]
    JavaInstall(#[from] JavaInstallError),
    #[error("{GAME_ERR_PREFIX}game jar not found at {0:?}\n\nTry removing and re-adding the instance")]
    GameNotInstalled(PathBuf),
    #[error("{GAME_ERR_PREFIX}couldn't run java command: {0}")]
    CommandError(std::io::Error),
    #[error("{GAME_ERR_PREFIX}couldn't read game output: {0}")]
    Output(std::io::Error),
}
