//! Profile photo processing for the registration form.
//!
//! Provides the center-crop fit transform (fixed output size, no distortion),
//! size-bounded compression, and PNG/JPEG decode/encode helpers.

pub mod compress;
pub mod fit;
pub mod format;
pub mod resize;

// Re-exports for convenience
pub use compress::{CompressOptions, compress, compress_image};
pub use fit::{CropWindow, PixelRect, TargetDimensions, fit_crop, fit_crop_bytes, needs_fit};
pub use format::{EncodedPhoto, PhotoFormat, PhotoHeader};
pub use image::imageops::FilterType;

/// Profile photo width in pixels (3.5cm on the printed card).
pub const PROFILE_PHOTO_WIDTH: u32 = 150;

/// Profile photo height in pixels (4.5cm on the printed card).
pub const PROFILE_PHOTO_HEIGHT: u32 = 190;

/// Errors that can occur while processing a photo.
///
/// Every variant is terminal for the call that produced it; no partial
/// output is ever returned alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Unsupported image format: {0} (expected PNG or JPEG)")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Result type alias for photo operations.
pub type Result<T> = std::result::Result<T, PhotoError>;
