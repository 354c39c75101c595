//! File-backed state storage.
//!
//! Each key is stored as `<data-dir>/<key>.json`. Writes go to a uniquely
//! named sibling temporary file first and are renamed into place, so a
//! crash or a concurrent writer leaves either the old document or a new
//! one, never a torn file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use aura_core::{StateStorage, StorageError};
use tempfile::NamedTempFile;

/// Longest accepted storage key.
const MAX_KEY_LEN: usize = 64;

/// Storage rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the stored documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key could escape the data directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

/// Keys must be 1-64 chars of ASCII alphanumeric, dash or underscore.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('-')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::Backend(format!("invalid storage key: {key:?}")))
    }
}

impl StateStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        // Unique per writer; removed on drop if anything below fails.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        tracing::trace!(key, path = %path.display(), bytes = value.len(), "State written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        assert_eq!(storage.read("aura-cart").unwrap(), None);
    }

    #[test]
    fn test_write_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.write("aura-cart", r#"{"items":[]}"#).unwrap();
        assert_eq!(
            storage.read("aura-cart").unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );
        assert!(dir.path().join("aura-cart.json").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        storage.remove("aura-cart").unwrap();
        storage.remove("aura-cart").unwrap();
        assert_eq!(storage.read("aura-cart").unwrap(), None);
    }

    #[test]
    fn test_overwrite_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.write("k", "first").unwrap();
        storage.write("k", "second").unwrap();

        assert_eq!(storage.read("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_concurrent_writers_never_tear_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        let values: Vec<String> = (0..8).map(|i| format!("{i}").repeat(64 * 1024)).collect();

        std::thread::scope(|scope| {
            for value in &values {
                let storage = storage.clone();
                scope.spawn(move || {
                    for _ in 0..5 {
                        storage.write("aura-cart", value).unwrap();
                    }
                });
            }
        });

        let stored = storage.read("aura-cart").unwrap().unwrap();
        assert!(values.contains(&stored));
        // Only the final document remains; no temporary files linger
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        FileStorage::open(&nested).unwrap();

        assert!(nested.is_dir());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", "-flag", "sp ace"] {
            assert!(storage.write(key, "x").is_err(), "accepted {key:?}");
        }
    }
}
