//! Center-crop-then-scale transform.
//!
//! Fits an arbitrary photo to fixed output dimensions without distortion:
//! the largest centered window with the target aspect ratio is cut from the
//! source and resampled onto a canvas of exactly the target size.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::format::{EncodedPhoto, PhotoFormat, PhotoHeader};
use crate::{PhotoError, Result};

/// JPEG quality used when re-encoding a cropped photo (matches the
/// browser canvas default of 0.92).
pub const REENCODE_JPEG_QUALITY: u8 = 92;

/// Output size of the fit transform. Both sides are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetDimensions {
    width: u32,
    height: u32,
}

impl TargetDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PhotoError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Sub-pixel crop rectangle in source coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Crop rectangle snapped to whole source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    /// Derive the centered window with the target's aspect ratio.
    ///
    /// Starts from the full source width; if the matching height overflows
    /// the source, the height is fixed instead and the width derived from it.
    pub fn centered(src_width: u32, src_height: u32, target: TargetDimensions) -> Result<Self> {
        if src_width == 0 || src_height == 0 {
            return Err(PhotoError::InvalidDimensions {
                width: src_width,
                height: src_height,
            });
        }

        let ratio = target.aspect_ratio();
        let (src_w, src_h) = (f64::from(src_width), f64::from(src_height));

        let mut width = src_w;
        let mut height = src_w / ratio;
        if height > src_h {
            height = src_h;
            width = src_h * ratio;
        }

        Ok(Self {
            x: (src_w - width) / 2.0,
            y: (src_h - height) / 2.0,
            width,
            height,
        })
    }

    /// Snap to the pixel grid, staying inside a `src_width` x `src_height` source.
    pub fn to_pixel_rect(&self, src_width: u32, src_height: u32) -> PixelRect {
        let width = (self.width.round() as u32).clamp(1, src_width.max(1));
        let height = (self.height.round() as u32).clamp(1, src_height.max(1));
        let x = (self.x.round() as u32).min(src_width.saturating_sub(width));
        let y = (self.y.round() as u32).min(src_height.saturating_sub(height));
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }
}

/// Fit a decoded image to `target` by center-crop then resample.
///
/// A source that already has the target size is returned unchanged.
pub fn fit_crop(
    img: &DynamicImage,
    target: TargetDimensions,
    filter: FilterType,
) -> Result<DynamicImage> {
    let (src_w, src_h) = (img.width(), img.height());

    if src_w == target.width() && src_h == target.height() {
        debug!(src_w, src_h, "Photo already at target size, skipping crop");
        return Ok(img.clone());
    }

    let window = CropWindow::centered(src_w, src_h, target)?;
    let rect = window.to_pixel_rect(src_w, src_h);

    debug!(
        src_w,
        src_h,
        crop_x = window.x,
        crop_y = window.y,
        crop_w = window.width,
        crop_h = window.height,
        target_w = target.width(),
        target_h = target.height(),
        "Fitting photo to target size"
    );

    let cropped = img.crop_imm(rect.x, rect.y, rect.width, rect.height);
    if rect.width == target.width() && rect.height == target.height() {
        return Ok(cropped);
    }
    Ok(cropped.resize_exact(target.width(), target.height(), filter))
}

/// Decode `bytes`, fit them to `target_width` x `target_height`, and
/// re-encode in the input's own format.
///
/// Dimensions are checked before anything is decoded or allocated.
pub fn fit_crop_bytes(
    bytes: &[u8],
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<EncodedPhoto> {
    let target = TargetDimensions::new(target_width, target_height)?;
    let format = PhotoFormat::detect(bytes)?;
    let img = format.decode(bytes)?;
    let fitted = fit_crop(&img, target, filter)?;
    EncodedPhoto::encode(&fitted, format, REENCODE_JPEG_QUALITY)
}

/// Whether the encoded photo has to go through [`fit_crop_bytes`]: its
/// upright size differs from `target`, or its pixels are stored rotated.
pub fn needs_fit(bytes: &[u8], target: TargetDimensions) -> Result<bool> {
    let header = PhotoHeader::read(bytes)?;
    let same_size = header.width == target.width() && header.height == target.height();
    Ok(!header.is_upright() || !same_size)
}
