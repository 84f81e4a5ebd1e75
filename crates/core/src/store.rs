//! The metadata store: the authoritative mapping of filename → upload
//! metadata, durable across restarts.
//!
//! The whole mapping lives in memory and is mirrored by one JSON document on
//! disk. Every successful upsert rewrites the full document before the
//! in-memory state is updated, so memory and disk agree immediately after
//! every acknowledged write. All mutation happens under a single lock; two
//! concurrent upserts cannot interleave their read-modify-write cycles.
//!
//! Persistence is atomic: the document is serialised to a temp file in the
//! same directory, synced, and renamed over the old document. A failed write
//! rejects the upsert and leaves both memory and disk untouched.

use crate::constants::CORRUPT_BACKUP_SUFFIX;
use crate::error::{UploadError, UploadResult};
use depot_types::{FileName, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// The stored facts about one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Client-supplied position label, free-form.
    pub position: String,
    /// Server-generated upload date, formatted `MM/DD/YYYY`.
    pub upload_date: String,
}

/// Mapping of filename to [`MetadataRecord`], backed by a JSON document.
///
/// Records are keyed by the exact uploaded filename; an upsert for an
/// existing key overwrites the record. No operation deletes a record.
/// Listing order is lexicographic by filename and therefore stable across
/// restarts.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, MetadataRecord>>,
}

impl MetadataStore {
    /// Loads the store from the backing document at `path`.
    ///
    /// A missing document means a fresh store: the mapping starts empty and
    /// the document is first written on the first upsert. A document that
    /// exists but cannot be parsed is renamed aside to
    /// `<name>.corrupt` and the store starts empty; the failure is logged
    /// as a warning rather than aborting startup.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::MetadataRead` if the document exists but cannot
    /// be read, or `UploadError::MetadataBackup` if a corrupt document
    /// cannot be moved aside.
    pub fn load(path: PathBuf) -> UploadResult<Self> {
        let records = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, MetadataRecord>>(&bytes) {
                Ok(records) => records,
                Err(parse_err) => {
                    let backup = backup_path(&path);
                    tracing::warn!(
                        document = %path.display(),
                        backup = %backup.display(),
                        error = %parse_err,
                        "metadata document is corrupt; moving it aside and starting empty"
                    );
                    fs::rename(&path, &backup).map_err(UploadError::MetadataBackup)?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(UploadError::MetadataRead(e)),
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Inserts or overwrites the record for `filename` and persists the
    /// whole mapping synchronously.
    ///
    /// The new mapping is committed to memory only after the document rename
    /// succeeds, so a persistence failure leaves the store exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::MetadataSerialize` or
    /// `UploadError::MetadataWrite` if the document cannot be produced or
    /// replaced.
    pub fn upsert(
        &self,
        filename: &FileName,
        position: &NonEmptyText,
        upload_date: &str,
    ) -> UploadResult<()> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = records.clone();
        next.insert(
            filename.as_str().to_owned(),
            MetadataRecord {
                position: position.as_str().to_owned(),
                upload_date: upload_date.to_owned(),
            },
        );

        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    /// Looks up the record for `filename`. Pure read, no side effects.
    pub fn get(&self, filename: &str) -> Option<MetadataRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(filename)
            .cloned()
    }

    /// Returns all records, ordered lexicographically by filename.
    pub fn list(&self) -> Vec<(String, MetadataRecord)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect()
    }

    /// Number of records in the mapping.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the mapping holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &BTreeMap<String, MetadataRecord>) -> UploadResult<()> {
        let bytes = serde_json::to_vec(records).map_err(UploadError::MetadataSerialize)?;

        // Temp file must live in the same directory as the document so the
        // final rename stays on one filesystem.
        let temp_path = sibling_with_suffix(&self.path, "tmp");
        let write_temp = |temp_path: &Path| -> std::io::Result<()> {
            let mut file = fs::File::create(temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            Ok(())
        };

        if let Err(e) = write_temp(&temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(UploadError::MetadataWrite(e));
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(UploadError::MetadataWrite(e));
        }

        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    sibling_with_suffix(path, CORRUPT_BACKUP_SUFFIX)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{file_name}.{suffix}"))
}
