//! File reads and atomic writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProjectError, Result};

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(ProjectError::io("read", path))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| ProjectError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Render `value` as two-space indented JSON with a trailing newline.
pub fn to_json_text<T: Serialize>(value: &T, path: &Path) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).map_err(|source| ProjectError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    Ok(text)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = to_json_text(value, path)?;
    write_atomic(path, text.as_bytes())
}

/// Write `bytes` to `path` through a temp file renamed into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(ProjectError::io("create directory", parent))?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = File::create(&temp_path).map_err(ProjectError::io("create", &temp_path))?;
    file.write_all(bytes)
        .map_err(ProjectError::io("write", &temp_path))?;
    file.sync_all().map_err(ProjectError::io("sync", &temp_path))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(ProjectError::io("replace", path))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

/// Delete `path` if it exists.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(ProjectError::Io {
            operation: "delete",
            path: path.to_path_buf(),
            source: error,
        }),
    }
}
