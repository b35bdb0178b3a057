//! High-level image operations.
//!
//! These combine the pure [`calculations`](super::calculations) with actual
//! resampling: fitting frames into the preview box and shrinking a loaded
//! photo to a working size before interactive filtering.

use super::Image;
use super::calculations::fit_within;
use image::imageops::{self, FilterType};

/// Scale `image` to the largest size that fits `bounds`, keeping the aspect ratio.
pub fn fit_for_display(image: &Image, bounds: (u32, u32)) -> Image {
    let (w, h) = fit_within(image.dimensions(), bounds);
    if (w, h) == image.dimensions() || w == 0 || h == 0 {
        return image.clone();
    }
    imageops::resize(image, w, h, FilterType::Triangle)
}

/// Shrink `image` to fit `bounds` if it is larger; never upscales.
///
/// `None` keeps the full resolution.
pub fn working_copy(image: &Image, bounds: Option<(u32, u32)>) -> Image {
    match bounds {
        Some((bw, bh)) if image.width() > bw || image.height() > bh => {
            fit_for_display(image, (bw, bh))
        }
        _ => image.clone(),
    }
}
