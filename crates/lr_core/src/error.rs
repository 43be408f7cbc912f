use std::path::PathBuf;

use thiserror::Error;

use crate::{archive::ArchiveError, RequestError};

#[derive(Clone, Debug, Error)]
pub enum IoError {
    #[error("at path {path:?}, error: {error}")]
    Io { error: String, path: PathBuf },
    #[error("config or AppData directory not found")]
    ConfigDirNotFound,
    #[error("path {0:?} is outside parent directory. POTENTIAL SECURITY RISK AVOIDED")]
    DirEscapeAttack(String),
}

pub trait IntoIoError<T> {
    #[allow(clippy::missing_errors_doc)]
    fn path(self, p: impl Into<PathBuf>) -> Result<T, IoError>;
}

impl<T> IntoIoError<T> for std::io::Result<T> {
    fn path(self, p: impl Into<PathBuf>) -> Result<T, IoError> {
        self.map_err(|err: std::io::Error| IoError::Io {
            error: err.to_string(),
            path: p.into(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JsonDownloadError {
    #[error(transparent)]
    RequestError(#[from] RequestError),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl From<lr_reqwest::Error> for JsonDownloadError {
    fn from(value: lr_reqwest::Error) -> Self {
        Self::RequestError(RequestError::ReqwestError(value))
    }
}

#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Failure while saving a remote file to disk.
#[derive(Debug, Error)]
pub enum DownloadFileError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Io(#[from] IoError),
}

impl From<lr_reqwest::Error> for DownloadFileError {
    fn from(value: lr_reqwest::Error) -> Self {
        Self::Request(RequestError::ReqwestError(value))
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("json error {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("invalid version: {0}")]
    VersionNotFoundInManifest(String),
    #[error("asset {name:?} has an invalid hash: {hash:?}")]
    InvalidAssetHash { name: String, hash: String },
    #[error("library {0} has no download path and no maven coordinate to derive one from")]
    NoLibraryPath(String),
    #[error("couldn't run blocking task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<JsonDownloadError> for DownloadError {
    fn from(value: JsonDownloadError) -> Self {
        match value {
            JsonDownloadError::RequestError(err) => DownloadError::from(err),
            JsonDownloadError::SerdeError(err) => DownloadError::from(err),
        }
    }
}

impl From<DownloadFileError> for DownloadError {
    fn from(value: DownloadFileError) -> Self {
        match value {
            DownloadFileError::Request(err) => DownloadError::from(err),
            DownloadFileError::Io(err) => DownloadError::from(err),
        }
    }
}

impl From<JsonFileError> for DownloadError {
    fn from(value: JsonFileError) -> Self {
        match value {
            JsonFileError::SerdeError(err) => DownloadError::from(err),
            JsonFileError::Io(err) => DownloadError::from(err),
        }
    }
}
