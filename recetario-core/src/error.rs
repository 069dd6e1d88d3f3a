use thiserror::Error;

/// Any failure talking to the persistence layer.
///
/// A missing record is not an error: updates and deletes report it as a zero count.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage query failed: {0}")]
    Query(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Title cannot be empty")]
    BlankTitle,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Could not detect image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, WebP")]
    UnsupportedFormat(String),

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Failed to store image: {0}")]
    Storage(String),
}

impl UploadError {
    /// True when the upload was refused because of its content, false for backend faults.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, UploadError::Storage(_))
    }
}

/// Failures that abort a service operation. Validation and not-found are outcomes, not errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}
