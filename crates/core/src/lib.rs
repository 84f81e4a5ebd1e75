//! # Depot Core
//!
//! Core logic for the depot upload service:
//! - the metadata store: filename → (position, upload date), persisted to a
//!   single JSON document
//! - the blob-plus-metadata upload workflow behind [`UploadService`]
//! - startup-resolved configuration ([`CoreConfig`])
//!
//! **No API concerns**: HTTP routing, extraction, and status mapping belong
//! in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use error::{UploadError, UploadResult};
pub use service::{UploadEntry, UploadService};
pub use store::{MetadataRecord, MetadataStore};
