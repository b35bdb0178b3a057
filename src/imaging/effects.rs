//! One-shot effects applied on top of whatever a session currently shows.
//!
//! Unlike the [`pipeline`](super::pipeline) filters these are not re-run from
//! the source; each call transforms the displayed image and can be chained.

use super::Image;
use super::filters::luminance;
use image::{GrayImage, Luma, Rgb};
use serde::{Deserialize, Serialize};

/// Hysteresis thresholds for edge detection.
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// White edges on black.
    Contour,
    /// JET false color by luminance.
    ColorMap,
    /// Horizontal flip.
    Mirror,
}

impl Effect {
    pub fn apply(self, image: &Image) -> Image {
        match self {
            Effect::Contour => contour(image),
            Effect::ColorMap => color_map(image),
            Effect::Mirror => image::imageops::flip_horizontal(image),
        }
    }
}

fn to_luma(image: &Image) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        Luma([luminance(r, g, b)])
    })
}

/// Canny edges of the luminance, as a three-channel image.
pub fn contour(image: &Image) -> Image {
    let edges = imageproc::edges::canny(&to_luma(image), CANNY_LOW, CANNY_HIGH);
    Image::from_fn(image.width(), image.height(), |x, y| {
        let e = edges.get_pixel(x, y).0[0];
        Rgb([e, e, e])
    })
}

/// Map luminance through the JET palette (blue → cyan → yellow → red).
pub fn color_map(image: &Image) -> Image {
    let lut: [[u8; 3]; 256] = std::array::from_fn(|i| jet(i as u8));
    Image::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        Rgb(lut[luminance(r, g, b) as usize])
    })
}

fn jet(value: u8) -> [u8; 3] {
    let t = value as f32 / 255.0;
    let channel = |offset: f32| {
        let c = (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    [channel(3.0), channel(2.0), channel(1.0)]
}
