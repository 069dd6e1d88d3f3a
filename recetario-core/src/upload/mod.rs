//! Upload collaborator abstraction.
//!
//! An uploader takes the bytes of a file-bearing request field and turns them into an
//! image reference (a URL or path) that can be stored on a recipe.

mod fake;

pub use fake::FakeUploader;

use async_trait::async_trait;
use std::fmt;

use crate::error::UploadError;

/// A file received with a request that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub data: Vec<u8>,
    /// Name the client gave the file. Informational only.
    pub file_name: Option<String>,
}

impl PendingImage {
    pub fn new(data: Vec<u8>, file_name: Option<String>) -> Self {
        Self { data, file_name }
    }
}

/// Stores uploaded images and returns their reference.
///
/// Implementations enforce the format allow-list (see [`crate::image::validate_image`]).
#[async_trait]
pub trait ImageUploader: Send + Sync + fmt::Debug {
    async fn upload(&self, image: PendingImage) -> Result<String, UploadError>;

    /// Remove an image this backend stored earlier. Unknown references are ignored.
    async fn discard(&self, reference: &str) -> Result<(), UploadError>;

    /// Backend name for logs, e.g. "local-disk".
    fn backend_name(&self) -> &'static str;
}
