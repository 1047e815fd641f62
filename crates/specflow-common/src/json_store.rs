//! Whole-file JSON documents on disk
//!
//! The history file is rewritten in full after every change, so writes go
//! through a sibling temp file and a rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::trace;

/// JSON store errors
#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    NotFound { path: String },
}

/// Result type for JSON store operations
pub type JsonStoreResult<T> = Result<T, JsonStoreError>;

/// Read and parse a JSON document
///
/// A missing file is [`JsonStoreError::NotFound`].
pub fn load_json<T, P>(path: P) -> JsonStoreResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    load_json_if_exists(path)?.ok_or_else(|| JsonStoreError::NotFound {
        path: path.display().to_string(),
    })
}

/// Read and parse a JSON document, `None` when the file does not exist
pub fn load_json_if_exists<T, P>(path: P) -> JsonStoreResult<Option<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    trace!(path = %path.display(), bytes = content.len(), "read json document");
    Ok(Some(serde_json::from_str(&content)?))
}

/// Replace a JSON document atomically
///
/// Parent directories are created as needed. A crash mid-write leaves
/// either the previous file or the new one.
pub fn save_json_atomic<T, P>(path: P, value: &T) -> JsonStoreResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value)?;
    let staging = staging_path(path);
    std::fs::write(&staging, &content)?;
    std::fs::rename(&staging, path)?;
    trace!(path = %path.display(), bytes = content.len(), "wrote json document");
    Ok(())
}

/// Delete a JSON document; `false` if there was nothing to delete
pub fn remove_json<P: AsRef<Path>>(path: P) -> JsonStoreResult<bool> {
    match std::fs::remove_file(path.as_ref()) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Cursor {
        label: String,
        position: i64,
    }

    fn cursor(position: i64) -> Cursor {
        Cursor {
            label: "history".to_string(),
            position,
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        save_json_atomic(&path, &cursor(-1)).unwrap();
        let loaded: Cursor = load_json(&path).unwrap();

        assert_eq!(loaded, cursor(-1));
        assert!(!dir.path().join("nested").join("history.json.tmp").exists());
    }

    #[test]
    fn test_save_replaces_previous_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");

        save_json_atomic(&path, &cursor(1)).unwrap();
        save_json_atomic(&path, &cursor(2)).unwrap();

        let loaded: Cursor = load_json(&path).unwrap();
        assert_eq!(loaded.position, 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let strict: JsonStoreResult<Cursor> = load_json(&path);
        assert!(matches!(strict, Err(JsonStoreError::NotFound { .. })));

        let lenient: Option<Cursor> = load_json_if_exists(&path).unwrap();
        assert!(lenient.is_none());
    }

    #[test]
    fn test_parse_errors_propagate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: JsonStoreResult<Option<Cursor>> = load_json_if_exists(&path);
        assert!(matches!(result, Err(JsonStoreError::Serialize(_))));
    }

    #[test]
    fn test_remove_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        save_json_atomic(&path, &cursor(0)).unwrap();

        assert!(remove_json(&path).unwrap());
        assert!(!path.exists());
        assert!(!remove_json(&path).unwrap());
    }
}
