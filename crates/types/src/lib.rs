//! Validated text types for the depot upload service.
//!
//! Request handlers accept arbitrary client strings; the storage layers only
//! accept the types in this crate. Construction is the single place where
//! validation happens, so a `FileName` held anywhere in the system is safe to
//! use as a filesystem name and a `NonEmptyText` is guaranteed to carry
//! content.

/// Maximum accepted filename length in bytes.
pub const MAX_FILENAME_BYTES: usize = 255;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when validating an upload filename.
#[derive(Debug, thiserror::Error)]
pub enum FileNameError {
    #[error("Filename cannot be empty")]
    Empty,
    #[error("Filename exceeds {MAX_FILENAME_BYTES} bytes")]
    TooLong,
    #[error("Filename must not contain path separators")]
    PathSeparator,
    #[error("Filename must not be '.' or '..'")]
    Reserved,
    #[error("Filename must not contain control characters")]
    ControlCharacter,
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` and ensures it contains at least one non-whitespace
/// character. The input is trimmed of leading and trailing whitespace during
/// construction. Used for the client-supplied position label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the
    /// trimmed result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A validated upload filename.
///
/// Uploaded filenames become both metadata keys and filesystem names inside
/// the blob directory, so the client string is validated before it reaches
/// either. A `FileName`:
///
/// - is non-empty and at most [`MAX_FILENAME_BYTES`] bytes
/// - contains no path separators (`/` or `\`)
/// - is not the `.` or `..` path component
/// - contains no ASCII control characters (including NUL)
///
/// The name is otherwise stored verbatim; no normalisation or collision
/// handling is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileName(String);

impl FileName {
    /// Validates and wraps an upload filename.
    ///
    /// # Errors
    ///
    /// Returns a `FileNameError` describing the first violated rule.
    pub fn new(input: impl AsRef<str>) -> Result<Self, FileNameError> {
        let name = input.as_ref();
        if name.is_empty() {
            return Err(FileNameError::Empty);
        }
        if name.len() > MAX_FILENAME_BYTES {
            return Err(FileNameError::TooLong);
        }
        if name == "." || name == ".." {
            return Err(FileNameError::Reserved);
        }
        if name.contains('/') || name.contains('\\') {
            return Err(FileNameError::PathSeparator);
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(FileNameError::ControlCharacter);
        }
        Ok(Self(name.to_owned()))
    }

    /// Returns the filename as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the filename, returning the inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for FileName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for FileName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FileName::new(&s).map_err(serde::de::Error::custom)
    }
}
