//! Blob store implementation.

use crate::BlobError;
use depot_types::FileName;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem store for uploaded file contents.
///
/// The store owns one directory and maps validated filenames to files inside
/// it. It is deliberately dumb: no content addressing, no deduplication, no
/// orphan cleanup. Consistency with the metadata store is the caller's
/// responsibility.
#[derive(Debug)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Opens a blob store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `BlobError::InvalidRootDirectory` if the directory cannot be
    /// created, is not a directory, or cannot be canonicalised.
    pub fn open(root: &Path) -> Result<Self, BlobError> {
        fs::create_dir_all(root).map_err(|e| {
            BlobError::InvalidRootDirectory(format!(
                "Cannot create directory {}: {}",
                root.display(),
                e
            ))
        })?;

        if !root.is_dir() {
            return Err(BlobError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root.display()
            )));
        }

        let root = root.canonicalize().map_err(|e| {
            BlobError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self { root })
    }

    /// Stores blob content under `name`, overwriting any existing blob.
    ///
    /// The content is written to a uniquely named temp file in the blob
    /// directory, flushed to disk, then renamed over the final name, so a
    /// crash mid-write never leaves a torn blob behind.
    ///
    /// # Errors
    ///
    /// Returns `BlobError::Io` if the temp file cannot be written, synced,
    /// or renamed.
    pub fn save(&self, name: &FileName, bytes: &[u8]) -> Result<(), BlobError> {
        let path = self.blob_path(name);
        let temp_path = self.root.join(format!(".tmp.{}", Uuid::new_v4()));

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&temp_path, &path) {
            // Leave nothing behind on failure; the unlink error is secondary.
            let _ = fs::remove_file(&temp_path);
            return Err(BlobError::Io(e));
        }

        Ok(())
    }

    /// Reads the blob stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `BlobError::NotFound` if no blob exists for the name, or
    /// `BlobError::Io` for any other read failure.
    pub fn read(&self, name: &FileName) -> Result<Vec<u8>, BlobError> {
        let path = self.blob_path(name);
        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlobError::NotFound(name.as_str().to_owned())
            } else {
                BlobError::Io(e)
            }
        })
    }

    /// Returns whether a blob exists under `name`.
    pub fn contains(&self, name: &FileName) -> bool {
        self.blob_path(name).is_file()
    }

    /// Returns the root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, name: &FileName) -> PathBuf {
        self.root.join(name.as_str())
    }
}
