//! Upload service and related types.
//!
//! [`UploadService`] is the one entry point the API handlers and the CLI
//! share. It owns the metadata store and the blob store and keeps the two in
//! the order the upload contract requires: blob first, then metadata, so a
//! record never points at bytes that were not accepted.

use crate::constants::UPLOAD_DATE_FORMAT;
use crate::error::{UploadError, UploadResult};
use crate::store::{MetadataRecord, MetadataStore};
use crate::CoreConfig;
use depot_files::BlobStore;
use depot_types::{FileName, NonEmptyText};
use std::fs;
use std::sync::Arc;

/// One row of the upload listing: a filename with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEntry {
    pub name: String,
    pub metadata: MetadataRecord,
}

/// Upload operations over the metadata store and the blob store.
#[derive(Clone)]
pub struct UploadService {
    cfg: Arc<CoreConfig>,
    store: Arc<MetadataStore>,
    blobs: Arc<BlobStore>,
}

impl UploadService {
    /// Opens the service for the configured data directory.
    ///
    /// Creates the data directory and the uploads directory if absent, and
    /// loads the metadata document (recovering from a corrupt one, see
    /// [`MetadataStore::load`]).
    ///
    /// # Errors
    ///
    /// Returns an `UploadError` if a directory cannot be created or the
    /// metadata document cannot be read or moved aside.
    pub fn open(cfg: Arc<CoreConfig>) -> UploadResult<Self> {
        fs::create_dir_all(cfg.data_dir()).map_err(UploadError::StorageDirCreation)?;
        let blobs = BlobStore::open(&cfg.uploads_dir())?;
        let store = MetadataStore::load(cfg.metadata_path())?;

        Ok(Self {
            cfg,
            store: Arc::new(store),
            blobs: Arc::new(blobs),
        })
    }

    /// Stores an upload: blob content first, then the metadata record
    /// stamped with today's date.
    ///
    /// A second upload under the same filename overwrites both the blob and
    /// the record.
    ///
    /// # Errors
    ///
    /// Returns an `UploadError` if the blob cannot be written or the
    /// metadata document cannot be persisted. A metadata failure after a
    /// successful blob write leaves the blob in place; the mapping is
    /// unchanged and the upload is reported as rejected.
    pub fn store_upload(
        &self,
        filename: &FileName,
        position: &NonEmptyText,
        content: &[u8],
    ) -> UploadResult<MetadataRecord> {
        self.blobs.save(filename, content)?;

        let upload_date = upload_date_now();
        self.store.upsert(filename, position, &upload_date)?;

        tracing::info!(
            filename = %filename,
            position = %position,
            size = content.len(),
            "stored upload"
        );

        Ok(MetadataRecord {
            position: position.as_str().to_owned(),
            upload_date,
        })
    }

    /// All uploads with their metadata, ordered by filename.
    pub fn list_uploads(&self) -> Vec<UploadEntry> {
        self.store
            .list()
            .into_iter()
            .map(|(name, metadata)| UploadEntry { name, metadata })
            .collect()
    }

    /// Metadata for one filename, if it was ever uploaded.
    pub fn stats(&self, filename: &str) -> Option<MetadataRecord> {
        self.store.get(filename)
    }

    /// Raw content of an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns an `UploadError` whose [`UploadError::is_not_found`] is true
    /// when no blob exists under the filename.
    pub fn read_upload(&self, filename: &FileName) -> UploadResult<Vec<u8>> {
        Ok(self.blobs.read(filename)?)
    }

    /// The configuration this service was opened with.
    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }
}

/// Today's date in the `upload_date` wire format (`MM/DD/YYYY`), local time.
pub fn upload_date_now() -> String {
    chrono::Local::now().format(UPLOAD_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service_in(temp: &TempDir) -> UploadService {
        let cfg = Arc::new(CoreConfig::new(temp.path().join("data")));
        UploadService::open(cfg).unwrap()
    }

    fn name(s: &str) -> FileName {
        FileName::new(s).unwrap()
    }

    fn position(s: &str) -> NonEmptyText {
        NonEmptyText::new(s).unwrap()
    }

    #[test]
    fn open_creates_data_layout() {
        let temp = TempDir::new().unwrap();

        let service = service_in(&temp);

        assert!(service.config().uploads_dir().is_dir());
        assert!(service.list_uploads().is_empty());
    }

    #[test]
    fn store_upload_records_position_and_todays_date() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        let record = service
            .store_upload(&name("a.txt"), &position("1"), b"content")
            .unwrap();

        assert_eq!(record.position, "1");
        assert_eq!(record.upload_date, upload_date_now());

        let stats = service.stats("a.txt").unwrap();
        assert_eq!(stats, record);
    }

    #[test]
    fn store_upload_persists_blob_and_metadata() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        service
            .store_upload(&name("a.txt"), &position("1"), b"content")
            .unwrap();

        assert_eq!(service.read_upload(&name("a.txt")).unwrap(), b"content");

        // A fresh service over the same data dir sees the same state.
        let reopened = service_in(&temp);
        assert_eq!(reopened.stats("a.txt").unwrap().position, "1");
        assert_eq!(reopened.read_upload(&name("a.txt")).unwrap(), b"content");
    }

    #[test]
    fn reupload_overwrites_blob_and_metadata() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        service
            .store_upload(&name("a.txt"), &position("1"), b"first")
            .unwrap();
        service
            .store_upload(&name("a.txt"), &position("2"), b"second")
            .unwrap();

        assert_eq!(service.list_uploads().len(), 1);
        assert_eq!(service.stats("a.txt").unwrap().position, "2");
        assert_eq!(service.read_upload(&name("a.txt")).unwrap(), b"second");
    }

    #[test]
    fn stats_for_unknown_filename_is_none() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        assert!(service.stats("missing.txt").is_none());
    }

    #[test]
    fn read_upload_for_unknown_filename_is_not_found() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        let result = service.read_upload(&name("missing.txt"));

        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }

    #[test]
    fn list_uploads_orders_by_filename() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        service
            .store_upload(&name("b.txt"), &position("2"), b"b")
            .unwrap();
        service
            .store_upload(&name("a.txt"), &position("1"), b"a")
            .unwrap();

        let names: Vec<_> = service
            .list_uploads()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn upload_date_matches_wire_format() {
        let date = upload_date_now();
        let parts: Vec<_> = date.split('/').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[1].len(), 2);
        assert_eq!(parts[2].len(), 4);
    }
}
