// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Writes the generated accessor file.

use crate::error::OutputError;
use std::fs;
use std::path::{Path, PathBuf};

/// Write generated source to `path`, replacing any previous file.
///
/// The content goes to a sibling temporary file first and is renamed into
/// place, so a failure never leaves a half-written artifact behind.
pub fn write_accessor(path: &Path, source: &str) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| write_error(path, format!("Failed to create directory: {}", e)))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, source)
        .map_err(|e| write_error(path, format!("Failed to write temporary file: {}", e)))?;

    if let Err(e) = fs::rename(&tmp, path) {
        fs::remove_file(&tmp).ok();
        return Err(write_error(path, format!("Failed to replace file: {}", e)));
    }

    tracing::debug!("Wrote {} bytes to {:?}", source.len(), path);
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "cfglayer".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_error(path: &Path, message: String) -> OutputError {
    OutputError::WriteError {
        path: path.to_path_buf(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gen").join("config.rs");
        write_accessor(&path, "pub struct Config {}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "pub struct Config {}\n");
    }

    #[test]
    fn test_write_overwrites_unconditionally() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.rs");
        fs::write(&path, "old contents that are longer than the new ones").unwrap();

        write_accessor(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!temp.path().join(".config.rs.tmp").exists());
    }

    #[test]
    fn test_write_failure_is_write_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file.txt");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_accessor(&blocker.join("config.rs"), "x").unwrap_err();
        assert!(matches!(err, OutputError::WriteError { .. }));
    }
}
