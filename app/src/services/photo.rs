//! Photo processing run off the async runtime.

use photo_engine::{
    CompressOptions, EncodedPhoto, FilterType, PhotoError, TargetDimensions, compress,
    fit_crop_bytes, needs_fit,
};

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Photo(#[from] PhotoError),

    #[error("Photo worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Compression and fit settings for member photos.
#[derive(Debug, Clone)]
pub struct PhotoProcessor {
    target: TargetDimensions,
    compress: CompressOptions,
}

impl PhotoProcessor {
    pub fn new(target: TargetDimensions, compress: CompressOptions) -> Self {
        Self { target, compress }
    }

    /// Shrink a freshly selected photo to the size budget.
    pub async fn compress(&self, bytes: Vec<u8>) -> Result<EncodedPhoto, ProcessError> {
        let opts = self.compress.clone();
        let photo = tokio::task::spawn_blocking(move || compress(&bytes, &opts)).await??;
        Ok(photo)
    }

    /// Fit `photo` to the target size. Upright photos already at that size
    /// are returned untouched.
    pub async fn fit(&self, photo: EncodedPhoto) -> Result<EncodedPhoto, ProcessError> {
        if !needs_fit(&photo.bytes, self.target)? {
            return Ok(photo);
        }
        let (w, h) = (self.target.width(), self.target.height());
        let fitted = tokio::task::spawn_blocking(move || {
            fit_crop_bytes(&photo.bytes, w, h, FilterType::Lanczos3)
        })
        .await??;
        Ok(fitted)
    }
}
