use std::{
    collections::HashSet,
    ffi::OsString,
    path::{Component, Path, PathBuf},
};

use futures::StreamExt;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

use crate::{
    do_jobs,
    error::{DownloadFileError, IoError},
    IntoIoError, JsonDownloadError, JsonFileError, CLIENT,
};

/// Returns the path to the Larchier root folder.
///
/// `$LARCHIER_DIR` wins if set, otherwise the system config dir is used:
/// - `~/.config/larchier` on Linux
/// - `~/AppData/Roaming/larchier` on Windows
/// - `~/Library/Application Support/larchier` on macOS
///
/// The folder is created if missing.
///
/// # Errors
/// - if config dir is not found
/// - if the launcher directory could not be created (permissions issue)
pub fn get_launcher_dir() -> Result<PathBuf, IoError> {
    let launcher_directory = match std::env::var_os("LARCHIER_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .ok_or(IoError::ConfigDirNotFound)?
            .join("larchier"),
    };

    std::fs::create_dir_all(&launcher_directory).path(&launcher_directory)?;
    Ok(launcher_directory)
}

/// Downloads a file from the given URL into a `String`.
///
/// # Errors
/// Returns an error if:
/// - Error sending request
/// - Request is rejected (HTTP status code)
/// - Redirect loop detected
/// - Redirect limit exhausted.
pub async fn download_file_to_string(url: &str) -> Result<String, RequestError> {
    let response = CLIENT.get(url).send().await?;
    if response.status().is_success() {
        Ok(response.text().await?)
    } else {
        Err(RequestError::DownloadError {
            code: response.status(),
            url: response.url().clone(),
        })
    }
}

/// Downloads a file from the given URL into a JSON.
///
/// More specifically, it tries to parse the contents
/// into anything implementing `serde::Deserialize`
///
/// # Errors
/// Same as [`download_file_to_string`], plus
/// if the body isn't valid JSON for `T`.
pub async fn download_file_to_json<T: DeserializeOwned>(url: &str) -> Result<T, JsonDownloadError> {
    let text = download_file_to_string(url).await?;
    Ok(serde_json::from_str(&text)?)
}

/// Downloads a file from the given URL and saves it to a path.
///
/// If `path` already exists nothing is requested and `Ok(false)`
/// is returned. Otherwise the body is streamed into `<path>.part`
/// which gets renamed to `path` once complete, and `Ok(true)` is
/// returned. A failed or cancelled download leaves nothing at `path`
/// and no `.part` file either.
///
/// # Errors
/// Returns an error if:
/// - Error sending request
/// - Request is rejected (HTTP status code)
/// - The body couldn't be written to disk
pub async fn download_file_to_path(url: &str, path: &Path) -> Result<bool, DownloadFileError> {
    download_file_to_path_with(&CLIENT, url, path).await
}

/// [`download_file_to_path`] with a caller-supplied client.
///
/// # Errors
/// See [`download_file_to_path`].
pub async fn download_file_to_path_with(
    client: &lr_reqwest::Client,
    url: &str,
    path: &Path,
) -> Result<bool, DownloadFileError> {
    if path.exists() {
        return Ok(false);
    }

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(RequestError::DownloadError {
            code: response.status(),
            url: response.url().clone(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        if !parent.is_dir() {
            tokio::fs::create_dir_all(&parent).await.path(parent)?;
        }
    }

    let part = PartFile(part_path(path));
    stream_to_file(response, &part.0).await?;
    tokio::fs::rename(&part.0, path).await.path(path)?;
    Ok(true)
}

/// Removes an unfinished `.part` file when dropped, including
/// when the download future itself is dropped mid-way
/// (another job in [`fetch_all`] failed).
struct PartFile(PathBuf);

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.0.exists() {
            _ = std::fs::remove_file(&self.0);
        }
    }
}

async fn stream_to_file(
    response: lr_reqwest::Response,
    path: &Path,
) -> Result<(), DownloadFileError> {
    let stream = response
        .bytes_stream()
        .map(|n| n.map_err(std::io::Error::other));
    let mut stream = StreamReader::new(stream);

    let mut file = tokio::fs::File::create(path).await.path(path)?;
    tokio::io::copy(&mut stream, &mut file).await.path(path)?;
    file.flush().await.path(path)?;
    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Downloads many `(url, path)` pairs concurrently.
///
/// Pairs pointing at the same path are fetched once (the first URL wins),
/// so no two downloads ever write the same file at the same time.
/// `on_done` is called after every finished download. Returns how many
/// files were actually fetched (existing ones are skipped).
///
/// # Errors
/// The first failed download, see [`download_file_to_path`].
pub async fn fetch_all(
    jobs: impl IntoIterator<Item = (String, PathBuf)>,
    on_done: &(dyn Fn() + Sync),
) -> Result<usize, DownloadFileError> {
    let mut seen = HashSet::new();
    let jobs: Vec<(String, PathBuf)> = jobs
        .into_iter()
        .filter(|(_, path)| seen.insert(path.clone()))
        .collect();

    let results = do_jobs(jobs.iter().map(|(url, path)| async move {
        let fetched = download_file_to_path(url, path).await?;
        on_done();
        Ok::<bool, DownloadFileError>(fetched)
    }))
    .await?;

    Ok(results.into_iter().filter(|fetched| *fetched).count())
}

/// Joins a path taken from remote metadata onto `base`,
/// refusing anything that would leave `base`.
///
/// # Errors
/// [`IoError::DirEscapeAttack`] if `relative` is absolute
/// or contains `..`.
pub fn join_within(base: &Path, relative: &Path) -> Result<PathBuf, IoError> {
    let is_safe = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if is_safe {
        Ok(base.join(relative))
    } else {
        Err(IoError::DirEscapeAttack(
            relative.to_string_lossy().into_owned(),
        ))
    }
}

/// Reads and parses a JSON file.
///
/// # Errors
/// - File couldn't be read
/// - File contents aren't valid JSON for `T`
pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, JsonFileError> {
    let text = tokio::fs::read_to_string(path).await.path(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
///
/// # Errors
/// - Serialization failed
/// - File couldn't be written
pub async fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), JsonFileError> {
    let text = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.path(parent)?;
    }
    tokio::fs::write(path, text).await.path(path)?;
    Ok(())
}

const NETWORK_ERROR_MSG: &str = r"
- Check your internet connection
- Check if you are behind a firewall/proxy
- Try doing the action again

";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Download Error (code {code}){NETWORK_ERROR_MSG}Url: {url}")]
    DownloadError {
        code: lr_reqwest::StatusCode,
        url: lr_reqwest::Url,
    },
    #[error("Network Request Error{NETWORK_ERROR_MSG}{0}")]
    ReqwestError(#[from] lr_reqwest::Error),
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;
    use crate::test_server::serve;

    fn client() -> lr_reqwest::Client {
        lr_reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn second_fetch_is_a_no_op() {
        let (url, hits) = serve(200, b"hello world").await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("file.bin");

        assert!(download_file_to_path_with(&client(), &url, &path)
            .await
            .unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");

        assert!(!download_file_to_path_with(&client(), &url, &path)
            .await
            .unwrap());
        assert_eq!(hits.get(), 1);
        assert!(!part_path(&path).exists());
    }

    #[tokio::test]
    async fn existing_file_is_never_requested() {
        let (url, hits) = serve(200, b"new").await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        std::fs::write(&path, b"old").unwrap();

        assert!(!download_file_to_path_with(&client(), &url, &path)
            .await
            .unwrap());
        assert_eq!(hits.get(), 0);
        assert_eq!(std::fs::read(&path).unwrap(), b"old");
    }

    #[tokio::test]
    async fn error_status_leaves_nothing_behind() {
        let (url, _) = serve(404, b"not found").await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");

        let err = download_file_to_path_with(&client(), &url, &path)
            .await
            .unwrap_err();
        match err {
            DownloadFileError::Request(RequestError::DownloadError { code, url: failed }) => {
                assert_eq!(code.as_u16(), 404);
                assert_eq!(failed.as_str(), url);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!path.exists());
        assert!(!part_path(&path).exists());
    }

    #[tokio::test]
    async fn cancelled_download_removes_part_file() {
        // Promises a body it never finishes sending.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/file.bin", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            _ = socket.read(&mut buf).await;
            _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000000\r\n\r\npartial")
                .await;
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        let download = tokio::spawn({
            let path = path.clone();
            async move { download_file_to_path_with(&client(), &url, &path).await }
        });

        let part = part_path(&path);
        for _ in 0..200 {
            if part.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(part.exists());

        download.abort();
        assert!(download.await.unwrap_err().is_cancelled());
        assert!(!part.exists());
        assert!(!path.exists());
    }

    #[test]
    fn part_path_keeps_full_file_name() {
        assert_eq!(
            part_path(Path::new("objects/a1/a1b2c3")),
            PathBuf::from("objects/a1/a1b2c3.part")
        );
        assert_eq!(
            part_path(Path::new("versions/1.20.4/1.20.4.jar")),
            PathBuf::from("versions/1.20.4/1.20.4.jar.part")
        );
    }

    #[test]
    fn join_within_rejects_escapes() {
        let base = Path::new("libraries");
        assert_eq!(
            join_within(base, Path::new("com/mojang/a.jar")).unwrap(),
            base.join("com/mojang/a.jar")
        );
        assert!(matches!(
            join_within(base, Path::new("../../evil.jar")),
            Err(IoError::DirEscapeAttack(_))
        ));
    }

    #[tokio::test]
    async fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b.json");
        write_json_file(&path, &vec!["x".to_owned(), "y".to_owned()])
            .await
            .unwrap();
        let back: Vec<String> = read_json_file(&path).await.unwrap();
        assert_eq!(back, ["x", "y"]);
    }
}
