//! Aspect-ratio-preserving downscaling for uploaded photos.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Size of a `width` x `height` image scaled so its longest edge is at most
/// `max_dimension`. Neither side drops below one pixel; never upscales.
pub fn scaled_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let max_dimension = max_dimension.max(1);
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width, height);
    }

    let scale = f64::from(max_dimension) / f64::from(longest);
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max_dimension);
    (scaled(width), scaled(height))
}

/// Downscale so that the longest edge is at most `max_dimension`.
///
/// Images already within bounds are returned unchanged.
pub fn fit_within(img: &DynamicImage, max_dimension: u32, filter: FilterType) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let (new_w, new_h) = scaled_size(w, h, max_dimension);

    if (new_w, new_h) == (w, h) {
        debug!(w, h, max_dimension, "Photo within dimension cap, skipping resize");
        return img.clone();
    }

    debug!(
        original_w = w,
        original_h = h,
        new_w,
        new_h,
        "Downscaling photo"
    );
    img.resize_exact(new_w, new_h, filter)
}
