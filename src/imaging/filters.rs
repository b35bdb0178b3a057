//! Pixel implementations of the six pipeline filters.
//!
//! Every function takes the input by reference and returns a new [`Image`];
//! nothing here mutates its argument. Convolutions go through
//! `imageproc::filter`; per-pixel loops run on rayon, one filter at a time.
//!
//! | Filter | Operation |
//! |---|---|
//! | Grayscale | BT.601 luma, fixed point, replicated to RGB |
//! | Blur | separable Gaussian (`separable_filter_equal`), edge pixels replicated |
//! | Brightness | `image::imageops::brighten`, saturating |
//! | Contrast | `round(p * gain)` in `f32`, saturating |
//! | Sharpen | 3x3 cross kernel (`filter3x3`), edge pixels replicated, saturating |
//! | Saturation | 8-bit HSV round trip with `S + shift` |

use super::Image;
use super::calculations::gaussian_kernel;
use image::{ImageBuffer, Rgb, imageops};
use imageproc::filter::{filter3x3, separable_filter_equal};
use rayon::prelude::*;

const CHANNELS: usize = 3;

// BT.601 luma weights scaled by 2^14.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Luminance of one RGB pixel.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + (1 << (LUMA_SHIFT - 1));
    (y >> LUMA_SHIFT) as u8
}

fn saturate(value: f32) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

fn is_empty(image: &Image) -> bool {
    image.width() == 0 || image.height() == 0
}

/// Apply a per-subpixel lookup table.
fn map_subpixels(image: &Image, lut: &[u8; 256]) -> Image {
    let mut out = image.clone();
    let buf: &mut [u8] = &mut out;
    buf.par_iter_mut().for_each(|p| *p = lut[*p as usize]);
    out
}

/// Collapse to luminance, then replicate it into all three channels.
pub fn grayscale(image: &Image) -> Image {
    let mut out = image.clone();
    let buf: &mut [u8] = &mut out;
    buf.par_chunks_exact_mut(CHANNELS).for_each(|px| {
        let y = luminance(px[0], px[1], px[2]);
        px.fill(y);
    });
    out
}

/// Gaussian smoothing with an odd `ksize x ksize` kernel.
///
/// Both passes accumulate in `f32` and the result is rounded once.
pub fn gaussian_blur(image: &Image, ksize: u32) -> Image {
    if is_empty(image) || ksize <= 1 {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let raw: Vec<f32> = image.as_raw().par_iter().map(|&p| p as f32).collect();
    let Some(float) = ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(width, height, raw) else {
        return image.clone();
    };
    let blurred = separable_filter_equal(&float, &gaussian_kernel(ksize));

    let mut out = Image::new(width, height);
    let dst: &mut [u8] = &mut out;
    dst.par_iter_mut()
        .zip(blurred.as_raw().par_iter())
        .for_each(|(d, &v)| *d = saturate(v));
    out
}

/// Add `shift` to every channel, saturating at 255.
pub fn brightness(image: &Image, shift: u8) -> Image {
    imageops::brighten(image, shift as i32)
}

/// Multiply every channel by `gain`, rounding and saturating.
pub fn contrast(image: &Image, gain: f32) -> Image {
    let lut: [u8; 256] = std::array::from_fn(|p| saturate(p as f32 * gain));
    map_subpixels(image, &lut)
}

/// Convolve with `[[0,-1,0],[-1,center,-1],[0,-1,0]]`.
pub fn sharpen(image: &Image, center: i32) -> Image {
    if is_empty(image) {
        return image.clone();
    }
    #[rustfmt::skip]
    let kernel = [
         0, -1,      0,
        -1, center, -1,
         0, -1,      0,
    ];
    filter3x3::<_, i32, u8>(image, &kernel)
}

/// Raise HSV saturation by `shift`, saturating at 255.
pub fn saturation(image: &Image, shift: u8) -> Image {
    let mut out = image.clone();
    let buf: &mut [u8] = &mut out;
    buf.par_chunks_exact_mut(CHANNELS).for_each(|px| {
        let (h, s, v) = rgb_to_hsv8(px[0], px[1], px[2]);
        let (r, g, b) = hsv8_to_rgb(h, s.saturating_add(shift), v);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    });
    out
}

/// RGB to 8-bit HSV: hue in `0..180` (degrees / 2), saturation and value in `0..=255`.
pub fn rgb_to_hsv8(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;

    let s = if v == 0 {
        0
    } else {
        saturate(diff * 255.0 / v as f32)
    };

    let h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (gf - bf) / diff
    } else if v == g {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    let h = if h < 0.0 { h + 360.0 } else { h };
    let h = saturate(h / 2.0);

    (if h >= 180 { 0 } else { h }, s, v)
}

/// Inverse of [`rgb_to_hsv8`].
pub fn hsv8_to_rgb(h: u8, s: u8, v: u8) -> (u8, u8, u8) {
    if s == 0 {
        return (v, v, v);
    }

    let s = s as f32 / 255.0;
    let v = v as f32 / 255.0;
    let h = (h as f32 * 2.0) / 60.0;
    let sector = h.floor();
    let frac = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * frac);
    let t = v * (1.0 - s * (1.0 - frac));

    let (r, g, b) = match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    (saturate(r * 255.0), saturate(g * 255.0), saturate(b * 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_uniform, gradient_image, uniform_image};

    #[test]
    fn luminance_uses_bt601_weights() {
        assert_eq!(luminance(200, 100, 50), 124);
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(0, 0, 0), 0);
        assert_eq!(luminance(255, 0, 0), 76);
    }

    #[test]
    fn grayscale_replicates_luminance() {
        let out = grayscale(&uniform_image(4, 4, [200, 100, 50]));
        assert_uniform(&out, [124, 124, 124]);
    }

    #[test]
    fn grayscale_is_idempotent() {
        let once = grayscale(&gradient_image(8, 6));
        let twice = grayscale(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn blur_keeps_uniform_image_uniform() {
        for ksize in [3, 5, 7, 9, 11] {
            let out = gaussian_blur(&uniform_image(10, 10, [90, 140, 200]), ksize);
            assert_uniform(&out, [90, 140, 200]);
        }
    }

    #[test]
    fn blur_smooths_a_single_spike() {
        let mut img = uniform_image(9, 9, [0, 0, 0]);
        img.put_pixel(4, 4, image::Rgb([255, 255, 255]));

        let out = gaussian_blur(&img, 3);
        // Center keeps 0.5 * 0.5 of the energy, direct neighbours 0.5 * 0.25
        assert_eq!(out.get_pixel(4, 4).0, [64, 64, 64]);
        assert_eq!(out.get_pixel(3, 4).0, [32, 32, 32]);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn stronger_blur_spreads_further() {
        let mut img = uniform_image(15, 15, [0, 0, 0]);
        img.put_pixel(7, 7, image::Rgb([255, 255, 255]));

        let weak = gaussian_blur(&img, 3);
        let strong = gaussian_blur(&img, 11);
        assert_eq!(weak.get_pixel(7, 10).0[0], 0);
        assert!(strong.get_pixel(7, 10).0[0] > 0);
        assert!(strong.get_pixel(7, 7).0[0] < weak.get_pixel(7, 7).0[0]);
    }

    #[test]
    fn blur_on_one_pixel_image() {
        let out = gaussian_blur(&uniform_image(1, 1, [10, 20, 30]), 11);
        assert_uniform(&out, [10, 20, 30]);
    }

    #[test]
    fn blur_on_empty_image_is_noop() {
        let empty = Image::new(0, 0);
        assert_eq!(gaussian_blur(&empty, 5).dimensions(), (0, 0));
    }

    #[test]
    fn brightness_adds_and_saturates() {
        let out = brightness(&uniform_image(3, 3, [128, 250, 0]), 50);
        assert_uniform(&out, [178, 255, 50]);
    }

    #[test]
    fn contrast_scales_and_saturates() {
        let out = contrast(&uniform_image(3, 3, [100, 200, 0]), 1.5);
        assert_uniform(&out, [150, 255, 0]);
    }

    #[test]
    fn contrast_scales_in_single_precision_half_to_even() {
        // In f32 the products are exactly 5.5, 16.5 and 27.5
        let out = contrast(&uniform_image(1, 1, [5, 15, 25]), 1.1);
        assert_eq!(out.get_pixel(0, 0).0, [6, 16, 28]);
    }

    #[test]
    fn sharpen_with_center_5_preserves_flat_regions() {
        let out = sharpen(&uniform_image(6, 6, [100, 60, 20]), 5);
        assert_uniform(&out, [100, 60, 20]);
    }

    #[test]
    fn sharpen_replicates_edge_pixels() {
        // A bright left column: with replicated edges its outer neighbour is
        // itself, so the column sees only one darker neighbour.
        let mut img = uniform_image(4, 3, [10, 10, 10]);
        for y in 0..3 {
            img.put_pixel(0, y, image::Rgb([50, 50, 50]));
        }
        let out = sharpen(&img, 5);
        // 5*50 - 50 (left, replicated) - 50 - 50 (up/down) - 10 (right)
        assert_eq!(out.get_pixel(0, 1).0, [90, 90, 90]);
        // 5*10 - 50 - 10 - 10 - 10
        assert_eq!(out.get_pixel(1, 1).0, [0, 0, 0]);
    }

    #[test]
    fn sharpen_with_low_center_darkens_to_zero() {
        // 1*p - 4*p is negative for any p > 0
        let out = sharpen(&uniform_image(4, 4, [100, 100, 100]), 1);
        assert_uniform(&out, [0, 0, 0]);
    }

    #[test]
    fn sharpen_with_high_center_saturates() {
        let out = sharpen(&uniform_image(4, 4, [100, 100, 100]), 10);
        assert_uniform(&out, [255, 255, 255]);
    }

    #[test]
    fn saturation_leaves_neutral_value_but_adds_color() {
        let out = saturation(&uniform_image(2, 2, [128, 128, 128]), 50);
        let px = out.get_pixel(0, 0).0;
        // Hue 0 (red) with V preserved as the max channel
        assert_eq!(px[0], 128);
        assert!(px[1] < 128);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn saturation_is_capped() {
        let out = saturation(&uniform_image(2, 2, [255, 0, 0]), 100);
        assert_uniform(&out, [255, 0, 0]);
    }

    #[test]
    fn hsv_round_trip_on_primaries() {
        for rgb in [(255, 0, 0), (0, 255, 0), (0, 0, 255), (0, 0, 0), (255, 255, 255)] {
            let (h, s, v) = rgb_to_hsv8(rgb.0, rgb.1, rgb.2);
            assert_eq!(hsv8_to_rgb(h, s, v), rgb);
        }
    }

    #[test]
    fn hsv_hue_is_halved_degrees() {
        assert_eq!(rgb_to_hsv8(0, 255, 0).0, 60);
        assert_eq!(rgb_to_hsv8(0, 0, 255).0, 120);
        let (_, s, v) = rgb_to_hsv8(128, 128, 128);
        assert_eq!((s, v), (0, 128));
    }

    #[test]
    fn filters_do_not_mutate_input() {
        let img = gradient_image(5, 5);
        let copy = img.clone();
        let _ = grayscale(&img);
        let _ = gaussian_blur(&img, 5);
        let _ = brightness(&img, 30);
        let _ = contrast(&img, 1.8);
        let _ = sharpen(&img, 7);
        let _ = saturation(&img, 40);
        assert_eq!(img, copy);
    }
}
