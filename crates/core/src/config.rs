//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services as `Arc<CoreConfig>`. Request handling never reads
//! process-wide environment variables, which keeps behaviour consistent
//! across multi-threaded runtimes and test harnesses.

use crate::constants::{METADATA_FILE_NAME, UPLOADS_DIR_NAME};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Creates a configuration rooted at `data_dir`.
    ///
    /// The directory itself is created lazily when the upload service opens;
    /// construction is pure.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Root directory for all persisted state.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding uploaded file contents.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join(UPLOADS_DIR_NAME)
    }

    /// Path of the backing metadata document.
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(METADATA_FILE_NAME)
    }
}
