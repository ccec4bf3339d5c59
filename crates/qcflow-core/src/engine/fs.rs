use super::error::EngineError;
use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Creates `path` and any missing parents.
///
/// Returns `true` when this call created the directory. A directory that already
/// exists, including one created concurrently by another worker, is not an error.
pub fn ensure_dir(path: &Path) -> Result<bool, EngineError> {
    if path.is_dir() {
        return Ok(false);
    }
    match fs::create_dir_all(path) {
        Ok(()) => {
            info!("Created directory {:?}", path);
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(false),
        Err(e) => Err(EngineError::io(path, e)),
    }
}

/// Moves `source` into `dest_dir`, keeping its file name.
///
/// The destination must not exist yet, so a document never overwrites another one and
/// never ends up in two directories. A rename is used when possible. Across filesystems
/// the file is copied under a hidden staging name, renamed into place and only then
/// removed from the source, so a partial copy never carries the real name.
///
/// The existence check and the rename are not atomic: the no-overwrite guarantee holds
/// only while each destination directory is written by a single, sequential mover.
pub fn move_into(source: &Path, dest_dir: &Path) -> Result<PathBuf, EngineError> {
    let file_name = source.file_name().ok_or_else(|| {
        EngineError::io(
            source,
            io::Error::new(ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let destination = dest_dir.join(file_name);
    if destination.exists() {
        return Err(EngineError::io(
            &destination,
            io::Error::new(ErrorKind::AlreadyExists, "destination already exists"),
        ));
    }

    match fs::rename(source, &destination) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!("Rename across devices, copying {:?}", source);
            move_across_devices(source, &destination)?;
        }
        Err(e) => return Err(EngineError::io(source, e)),
    }
    debug!("Moved {:?} -> {:?}", source, destination);
    Ok(destination)
}

fn move_across_devices(source: &Path, destination: &Path) -> Result<(), EngineError> {
    let staging = staging_path(destination);
    let staged = fs::copy(source, &staging).and_then(|_| fs::rename(&staging, destination));
    if let Err(e) = staged {
        discard(&staging);
        return Err(EngineError::io(destination, e));
    }
    if let Err(e) = fs::remove_file(source) {
        discard(destination);
        return Err(EngineError::io(source, e));
    }
    Ok(())
}

/// `<dir>/.<name>.partial`, the name a cross-device copy is written under.
fn staging_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(destination.file_name().unwrap_or_default());
    name.push(".partial");
    destination.with_file_name(name)
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            warn!("Failed to remove {:?} after an interrupted move: {}", path, e);
        }
    }
}

/// Lists the regular files of `dir`, sorted by file name.
///
/// # Errors
///
/// Returns [`EngineError::MissingDirectory`] if `dir` is not a directory.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    if !dir.is_dir() {
        return Err(EngineError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))? {
        let entry = entry.map_err(|e| EngineError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// The job name of a document: its file name without the final extension.
pub fn job_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}
