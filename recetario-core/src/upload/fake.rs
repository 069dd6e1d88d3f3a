//! Fake uploader for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ImageUploader, PendingImage};
use crate::error::UploadError;
use crate::image::validate_image;

/// Validates uploads like a real backend but only hands out made-up references.
///
/// References look like `<prefix>/<n>.<ext>` where `n` counts successful uploads from 1.
#[derive(Debug)]
pub struct FakeUploader {
    prefix: String,
    failure: Option<String>,
    uploads: AtomicUsize,
    discarded: AtomicUsize,
}

impl Default for FakeUploader {
    fn default() -> Self {
        Self::new("fake://uploads")
    }
}

impl FakeUploader {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            failure: None,
            uploads: AtomicUsize::new(0),
            discarded: AtomicUsize::new(0),
        }
    }

    /// An uploader whose backend always fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Number of successful uploads so far, discarded ones included.
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Number of uploaded references discarded so far.
    pub fn discarded(&self) -> usize {
        self.discarded.load(Ordering::SeqCst)
    }

    /// Images uploaded and not discarded since.
    pub fn stored(&self) -> usize {
        self.uploads().saturating_sub(self.discarded())
    }
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload(&self, image: PendingImage) -> Result<String, UploadError> {
        let accepted = validate_image(&image.data)?;

        if let Some(message) = &self.failure {
            return Err(UploadError::Storage(message.clone()));
        }

        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{}/{}.{}", self.prefix, n, accepted.extension()))
    }

    async fn discard(&self, reference: &str) -> Result<(), UploadError> {
        if reference.starts_with(&format!("{}/", self.prefix)) {
            self.discarded.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}
