//! Names and formats fixed by the persisted-state layout.

/// Directory under the data dir holding uploaded file contents.
pub const UPLOADS_DIR_NAME: &str = "uploads";

/// Backing metadata document, one JSON object mapping filename to record.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Suffix appended to the metadata document when it is moved aside because
/// it could not be parsed at startup.
pub const CORRUPT_BACKUP_SUFFIX: &str = "corrupt";

/// `strftime` format of the `upload_date` field (month/day/year).
pub const UPLOAD_DATE_FORMAT: &str = "%m/%d/%Y";
