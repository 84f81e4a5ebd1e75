//! Depot blob storage.
//!
//! This crate stores uploaded file contents on the local filesystem. Blobs
//! live in a single directory and are named exactly as uploaded; the metadata
//! store references them by filename only and never inspects content.
//!
//! ## Storage model
//!
//! - One flat directory, created on open if absent
//! - Blob name == validated upload filename ([`depot_types::FileName`])
//! - A re-upload of the same name overwrites the existing blob
//! - Writes are atomic: temp file in the same directory, fsync, rename
//!
//! Filename validation happens at construction of [`depot_types::FileName`],
//! so no path supplied to this crate can escape the blob directory.

mod store;

pub use store::BlobStore;

/// Best-effort media type detection from blob content.
///
/// Returns `None` when the content does not match any known signature; the
/// caller decides on a fallback (HTTP handlers use `application/octet-stream`).
pub fn media_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

/// Errors that can occur during blob operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// Blob root directory could not be created or resolved
    #[error("Invalid blob directory: {0}")]
    InvalidRootDirectory(String),

    /// No blob stored under the given filename
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
