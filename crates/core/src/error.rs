use depot_files::BlobError;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read metadata document: {0}")]
    MetadataRead(std::io::Error),
    #[error("failed to back up corrupt metadata document: {0}")]
    MetadataBackup(std::io::Error),
    #[error("failed to serialize metadata: {0}")]
    MetadataSerialize(serde_json::Error),
    #[error("failed to persist metadata document: {0}")]
    MetadataWrite(std::io::Error),
    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),
}

impl UploadError {
    /// Whether this error means a requested blob does not exist.
    ///
    /// The API layer maps this case to a not-found response rather than a
    /// server fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Blob(BlobError::NotFound(_)))
    }
}

pub type UploadResult<T> = std::result::Result<T, UploadError>;
