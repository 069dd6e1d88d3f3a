//! Image allow-listing shared by upload backends.
//!
//! Formats are detected from magic bytes; the client-supplied file name is never trusted.

use image::ImageFormat;

use crate::error::UploadError;

/// Allowed image formats for recipe images.
pub const ALLOWED_FORMATS: &[ImageFormat] =
    &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Maximum upload size (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// An image that passed the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedImage {
    pub format: ImageFormat,
}

impl AcceptedImage {
    /// MIME type, e.g. "image/png".
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Canonical file extension without the dot, e.g. "jpg".
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }
}

/// Check size and format of uploaded bytes.
pub fn validate_image(data: &[u8]) -> Result<AcceptedImage, UploadError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let format = image::guess_format(data).map_err(|_| UploadError::UnknownFormat)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(UploadError::UnsupportedFormat(format!("{:?}", format)));
    }

    Ok(AcceptedImage { format })
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    pub const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    pub const WEBP_HEADER: &[u8] = b"RIFF\x24\0\0\0WEBPVP8 ";
    pub const GIF_HEADER: &[u8] = b"GIF89a\x01\0\x01\0";
}
