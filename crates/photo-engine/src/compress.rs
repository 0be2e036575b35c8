//! Size-bounded photo compression.
//!
//! Downscales to a maximum edge length, then lowers JPEG quality and, if
//! needed, shrinks the image further until the encoded size fits the budget.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, warn};

use crate::format::{EncodedPhoto, PhotoFormat, PhotoHeader};
use crate::{PhotoError, Result, resize};

/// Scale factor applied per shrink step once quality alone is not enough.
const SHRINK_FACTOR: f64 = 0.9;

/// Upper bound on shrink steps before settling for the smallest attempt.
const MAX_SHRINK_STEPS: u32 = 12;

/// Compression limits applied when a photo is selected.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Encoded size budget in bytes.
    pub max_size_bytes: usize,
    /// Longest edge after downscaling, in pixels.
    pub max_dimension: u32,
    /// First JPEG quality tried.
    pub initial_quality: u8,
    /// Lowest JPEG quality tried before shrinking.
    pub min_quality: u8,
    pub quality_step: u8,
    pub filter: FilterType,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_size_bytes: 100 * 1024,
            max_dimension: 800,
            initial_quality: 90,
            min_quality: 40,
            quality_step: 10,
            filter: FilterType::Lanczos3,
        }
    }
}

impl CompressOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the size budget in kilobytes.
    pub fn with_max_size_kb(mut self, kb: usize) -> Self {
        self.max_size_bytes = kb.max(1) * 1024;
        self
    }

    /// Builder: set the longest-edge cap.
    pub fn with_max_dimension(mut self, px: u32) -> Self {
        self.max_dimension = px.max(1);
        self
    }

    /// Builder: set the resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Qualities to try for one size, highest first.
    fn qualities(&self, format: PhotoFormat) -> Vec<u8> {
        if format == PhotoFormat::Png {
            return vec![self.initial_quality];
        }
        let step = self.quality_step.max(1);
        let floor = self.min_quality.min(self.initial_quality);
        let mut out = Vec::new();
        let mut q = self.initial_quality;
        loop {
            out.push(q);
            if q <= floor {
                break;
            }
            q = q.saturating_sub(step).max(floor);
        }
        out
    }
}

/// Compress encoded PNG/JPEG bytes to fit `opts`.
///
/// Photos already within both the size budget and the dimension cap are
/// returned as-is. Otherwise this is best effort: if no attempt fits the
/// budget, the smallest one is returned.
pub fn compress(bytes: &[u8], opts: &CompressOptions) -> Result<EncodedPhoto> {
    let format = PhotoFormat::detect(bytes)?;
    let header = PhotoHeader::read(bytes)?;
    let (w, h) = (header.width, header.height);

    // Rotated photos are always re-encoded so the stored pixels are upright.
    if header.is_upright()
        && bytes.len() <= opts.max_size_bytes
        && w <= opts.max_dimension
        && h <= opts.max_dimension
    {
        debug!(size = bytes.len(), w, h, "Photo already within limits");
        return Ok(EncodedPhoto {
            bytes: bytes.to_vec(),
            format,
            width: w,
            height: h,
        });
    }

    let img = format.decode(bytes)?;
    compress_image(&img, format, opts)
}

/// Compress a decoded image, encoding it as `format`.
pub fn compress_image(
    img: &DynamicImage,
    format: PhotoFormat,
    opts: &CompressOptions,
) -> Result<EncodedPhoto> {
    let mut current = resize::fit_within(img, opts.max_dimension, opts.filter);
    let qualities = opts.qualities(format);
    let mut smallest: Option<EncodedPhoto> = None;

    for step in 0..=MAX_SHRINK_STEPS {
        if step > 0 {
            let w = ((f64::from(current.width()) * SHRINK_FACTOR).floor() as u32).max(1);
            let h = ((f64::from(current.height()) * SHRINK_FACTOR).floor() as u32).max(1);
            if (w, h) == (current.width(), current.height()) {
                break;
            }
            current = current.resize_exact(w, h, opts.filter);
        }

        for &quality in &qualities {
            let candidate = EncodedPhoto::encode(&current, format, quality)?;
            debug!(
                step,
                quality,
                size = candidate.bytes.len(),
                width = candidate.width,
                height = candidate.height,
                "Compression attempt"
            );

            if candidate.bytes.len() <= opts.max_size_bytes {
                return Ok(candidate);
            }
            if smallest.as_ref().is_none_or(|s| candidate.bytes.len() < s.bytes.len()) {
                smallest = Some(candidate);
            }
        }
    }

    let smallest =
        smallest.ok_or_else(|| PhotoError::Encode("no compression attempt was made".into()))?;
    warn!(
        size = smallest.bytes.len(),
        budget = opts.max_size_bytes,
        "Photo could not be compressed within budget, using smallest attempt"
    );
    Ok(smallest)
}
