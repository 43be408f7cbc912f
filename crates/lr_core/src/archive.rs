use std::{
    fs::File,
    io::BufReader,
    path::{Component, Path, PathBuf},
};

use flate2::read::GzDecoder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("couldn't extract {archive:?}: zip error: {error}")]
    Zip {
        archive: PathBuf,
        #[source]
        error: zip::result::ZipError,
    },
    #[error("couldn't extract {archive:?}: {error}")]
    Io {
        archive: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("couldn't extract {archive:?}: entry {entry:?} is outside the destination. POTENTIAL SECURITY RISK AVOIDED")]
    EntryOutsideDestination { archive: PathBuf, entry: String },
}

trait ArchiveContext<T> {
    fn archive(self, archive: &Path) -> Result<T, ArchiveError>;
}

impl<T> ArchiveContext<T> for std::io::Result<T> {
    fn archive(self, archive: &Path) -> Result<T, ArchiveError> {
        self.map_err(|error| ArchiveError::Io {
            archive: archive.to_owned(),
            error,
        })
    }
}

impl<T> ArchiveContext<T> for zip::result::ZipResult<T> {
    fn archive(self, archive: &Path) -> Result<T, ArchiveError> {
        self.map_err(|error| ArchiveError::Zip {
            archive: archive.to_owned(),
            error,
        })
    }
}

/// Extracts a `.zip` file into `dest`.
///
/// With `strip_top_level` the first path component of every entry
/// is dropped, so `jdk-21/bin/java` lands at `dest/bin/java`.
///
/// If anything goes wrong `dest` is deleted entirely,
/// so only call this with a directory made for this archive.
///
/// This is blocking, run it inside `spawn_blocking` from async code.
///
/// # Errors
/// - archive missing or corrupt
/// - an entry would be written outside `dest`
/// - files couldn't be written
pub fn extract_zip(archive: &Path, dest: &Path, strip_top_level: bool) -> Result<(), ArchiveError> {
    rollback_on_error(dest, extract_zip_inner(archive, dest, strip_top_level))
}

fn extract_zip_inner(
    archive_path: &Path,
    dest: &Path,
    strip_top_level: bool,
) -> Result<(), ArchiveError> {
    let file = File::open(archive_path).archive(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).archive(archive_path)?;
    std::fs::create_dir_all(dest).archive(archive_path)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).archive(archive_path)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ArchiveError::EntryOutsideDestination {
                archive: archive_path.to_owned(),
                entry: entry.name().to_owned(),
            });
        };
        let relative: PathBuf = if strip_top_level {
            relative.components().skip(1).collect()
        } else {
            relative
        };
        if relative.as_os_str().is_empty() {
            // The stripped top-level folder itself.
            continue;
        }

        let out_path = dest.join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).archive(archive_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).archive(archive_path)?;
        }
        let mut out_file = File::create(&out_path).archive(archive_path)?;
        std::io::copy(&mut entry, &mut out_file).archive(archive_path)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode & 0o777))
                .archive(archive_path)?;
        }
    }

    Ok(())
}

/// Extracts a `.tar.gz` file into `dest`, always dropping
/// the top-level folder of every entry.
///
/// Same rollback and blocking behaviour as [`extract_zip`].
///
/// # Errors
/// See [`extract_zip`].
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<(), ArchiveError> {
    rollback_on_error(dest, extract_tar_gz_inner(archive, dest))
}

fn extract_tar_gz_inner(archive_path: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive_path).archive(archive_path)?;
    // For extracting the `.gz`
    let decoder = GzDecoder::new(BufReader::new(file));
    // For extracting the `.tar`
    let mut tar = tar::Archive::new(decoder);
    std::fs::create_dir_all(dest).archive(archive_path)?;

    for entry in tar.entries().archive(archive_path)? {
        let mut entry = entry.archive(archive_path)?;
        let entry_path = entry.path().archive(archive_path)?.into_owned();

        let mut components = entry_path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .skip(1)
            .peekable();
        if components.peek().is_none() {
            continue;
        }
        if !components
            .clone()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(ArchiveError::EntryOutsideDestination {
                archive: archive_path.to_owned(),
                entry: entry_path.to_string_lossy().into_owned(),
            });
        }
        let full_path = dest.join(components.collect::<PathBuf>());

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).archive(archive_path)?;
        }
        entry.unpack(&full_path).archive(archive_path)?;
    }

    Ok(())
}

fn rollback_on_error(dest: &Path, result: Result<(), ArchiveError>) -> Result<(), ArchiveError> {
    if result.is_err() && dest.exists() {
        _ = std::fs::remove_dir_all(dest);
    }
    result
}

/// Copies the native libraries (files ending in one of `extensions`)
/// out of a jar into `natives_dir`, dropping their folder structure.
///
/// Unlike [`extract_zip`] nothing is rolled back on failure,
/// as `natives_dir` is shared by every native jar of a version.
///
/// Returns how many files were extracted.
///
/// # Errors
/// - jar missing or corrupt
/// - files couldn't be written
pub fn extract_shared_libraries(
    jar: &Path,
    natives_dir: &Path,
    extensions: &[&str],
) -> Result<usize, ArchiveError> {
    let file = File::open(jar).archive(jar)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).archive(jar)?;
    std::fs::create_dir_all(natives_dir).archive(jar)?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).archive(jar)?;
        if entry.is_dir() {
            continue;
        }
        let Some(file_name) = entry
            .enclosed_name()
            .and_then(|p| p.file_name().map(ToOwned::to_owned))
        else {
            continue;
        };
        let is_native = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e));
        if !is_native {
            continue;
        }

        let out_path = natives_dir.join(file_name);
        let mut out_file = File::create(&out_path).archive(jar)?;
        std::io::copy(&mut entry, &mut out_file).archive(jar)?;
        extracted += 1;
    }

    Ok(extracted)
}
