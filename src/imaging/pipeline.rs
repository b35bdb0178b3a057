//! The filter pipeline: source image + [`FilterSet`] → derived image.
//!
//! Filters run in the fixed order declared by [`FilterKind::ALL`], each one
//! consuming the previous output. Disabled selections are skipped. The source
//! is only ever read, so a caller holding it can always revert.

use super::Image;
use super::calculations::blur_kernel_size;
use super::filters;
use super::params::{FilterKind, FilterSet, FilterSpec};
use tracing::debug;

/// Run every enabled filter in `specs` over `source`.
///
/// Returns `None` when there is no source image to work on.
pub fn apply(source: Option<&Image>, specs: &FilterSet) -> Option<Image> {
    let source = source?;
    let mut current = source.clone();
    for spec in specs.enabled() {
        debug!(filter = %spec.kind, intensity = spec.intensity.value(), "applying filter");
        current = apply_one(&current, spec);
    }
    Some(current)
}

/// Apply a single selection, ignoring its `enabled` flag.
pub fn apply_one(image: &Image, spec: &FilterSpec) -> Image {
    let v = spec.intensity.value();
    match spec.kind {
        FilterKind::Grayscale => filters::grayscale(image),
        FilterKind::Blur => filters::gaussian_blur(image, blur_kernel_size(v)),
        FilterKind::Brightness => filters::brightness(image, (v * 10) as u8),
        FilterKind::Contrast => filters::contrast(image, 1.0 + v as f32 / 10.0),
        FilterKind::Sharpen => filters::sharpen(image, v as i32),
        FilterKind::Saturation => filters::saturation(image, (v * 10) as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Intensity;
    use crate::test_helpers::{assert_uniform, gradient_image, uniform_image};

    fn only(kind: FilterKind, v: u32) -> FilterSet {
        let mut set = FilterSet::new();
        set.enable(kind, Intensity::new(v));
        set
    }

    #[test]
    fn no_source_is_noop() {
        assert!(apply(None, &only(FilterKind::Blur, 5)).is_none());
    }

    #[test]
    fn all_disabled_is_identity() {
        let img = gradient_image(12, 9);
        let out = apply(Some(&img), &FilterSet::new()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn disabled_spec_ignores_intensity() {
        let img = gradient_image(6, 6);
        let mut set = FilterSet::new();
        set.set(FilterKind::Brightness, false, Intensity::new(10));
        set.set(FilterKind::Sharpen, false, Intensity::new(1));
        assert_eq!(apply(Some(&img), &set).unwrap(), img);
    }

    #[test]
    fn brightness_5_on_mid_gray() {
        let img = uniform_image(10, 10, [128, 128, 128]);
        let out = apply(Some(&img), &only(FilterKind::Brightness, 5)).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        assert_uniform(&out, [178, 178, 178]);
    }

    #[test]
    fn brightness_clamps_at_white() {
        let img = uniform_image(2, 2, [250, 200, 160]);
        let out = apply(Some(&img), &only(FilterKind::Brightness, 10)).unwrap();
        assert_uniform(&out, [255, 255, 255]);
    }

    #[test]
    fn grayscale_on_warm_color() {
        let img = uniform_image(5, 5, [200, 100, 50]);
        let out = apply(Some(&img), &only(FilterKind::Grayscale, 1)).unwrap();
        assert_uniform(&out, [124, 124, 124]);
    }

    #[test]
    fn contrast_intensity_maps_to_gain() {
        let img = uniform_image(3, 3, [100, 100, 100]);
        let out = apply(Some(&img), &only(FilterKind::Contrast, 5)).unwrap();
        assert_uniform(&out, [150, 150, 150]);
    }

    #[test]
    fn source_is_not_mutated() {
        let img = gradient_image(8, 8);
        let copy = img.clone();
        let mut set = FilterSet::new();
        for kind in FilterKind::ALL {
            set.enable(kind, Intensity::new(6));
        }
        let out = apply(Some(&img), &set).unwrap();
        assert_eq!(img, copy);
        assert_ne!(out, img);
    }

    #[test]
    fn order_is_fixed_regardless_of_selection_order() {
        let img = gradient_image(8, 8);

        let mut a = FilterSet::new();
        a.enable(FilterKind::Contrast, Intensity::new(4))
            .enable(FilterKind::Brightness, Intensity::new(9));
        let mut b = FilterSet::new();
        b.enable(FilterKind::Brightness, Intensity::new(9))
            .enable(FilterKind::Contrast, Intensity::new(4));

        assert_eq!(apply(Some(&img), &a), apply(Some(&img), &b));
    }

    #[test]
    fn order_matters_for_the_result() {
        // Brightness then Contrast: (100 + 50) * 2 = 300 → 255.
        // The reverse would give 100 * 2 + 50 = 250.
        let img = uniform_image(2, 2, [100, 100, 100]);
        let mut set = FilterSet::new();
        set.enable(FilterKind::Contrast, Intensity::new(10))
            .enable(FilterKind::Brightness, Intensity::new(5));
        let out = apply(Some(&img), &set).unwrap();
        assert_uniform(&out, [255, 255, 255]);

        let manual = apply_one(
            &apply_one(&img, set.get(FilterKind::Contrast)),
            set.get(FilterKind::Brightness),
        );
        assert_uniform(&manual, [250, 250, 250]);
    }

    #[test]
    fn saturation_after_grayscale_sees_three_channels() {
        let img = uniform_image(4, 4, [200, 100, 50]);
        let mut set = FilterSet::new();
        set.enable(FilterKind::Grayscale, Intensity::new(1))
            .enable(FilterKind::Saturation, Intensity::new(3));

        let out = apply(Some(&img), &set).unwrap();
        let [r, g, b] = out.get_pixel(0, 0).0;
        // Gray 124 with S raised from 0 to 30 at hue 0: red keeps V, others drop
        assert_eq!(r, 124);
        assert!(g < r);
        assert_eq!(g, b);
    }
}
