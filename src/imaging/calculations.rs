//! Pure calculation functions for filter parameters and display geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Gaussian kernel size for a blur intensity.
///
/// `2 * floor(v / 2) + 1`, never below 3, so the kernel always has a center.
///
/// # Examples
/// ```
/// # use photo_lab::imaging::blur_kernel_size;
/// assert_eq!(blur_kernel_size(1), 3);
/// assert_eq!(blur_kernel_size(4), 5);
/// assert_eq!(blur_kernel_size(10), 11);
/// ```
pub fn blur_kernel_size(intensity: u32) -> u32 {
    (intensity / 2 * 2 + 1).max(3)
}

/// Standard deviation implied by a kernel size when none is given explicitly.
pub fn gaussian_sigma(ksize: u32) -> f64 {
    0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights for an odd kernel size.
///
/// Sizes up to 7 use the fixed binomial-style tables; larger sizes are sampled
/// from [`gaussian_sigma`].
pub fn gaussian_kernel(ksize: u32) -> Vec<f32> {
    match ksize {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![
            0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
        ],
        _ => {
            let sigma = gaussian_sigma(ksize);
            let scale = -0.5 / (sigma * sigma);
            let center = (ksize / 2) as f64;
            let raw: Vec<f64> = (0..ksize)
                .map(|i| {
                    let x = i as f64 - center;
                    (scale * x * x).exp()
                })
                .collect();
            let sum: f64 = raw.iter().sum();
            raw.into_iter().map(|w| (w / sum) as f32).collect()
        }
    }
}

/// Largest dimensions that fit inside `bounds` while keeping the source aspect ratio.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Box to fit into (width, height)
///
/// # Returns
/// * `(width, height)` - Never zero in either direction for a non-empty source
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = bounds;
    if src_w == 0 || src_h == 0 || box_w == 0 || box_h == 0 {
        return (0, 0);
    }

    let scale = (box_w as f64 / src_w as f64).min(box_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, box_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, box_h);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_kernel_is_odd_and_at_least_3() {
        for v in 1..=10 {
            let k = blur_kernel_size(v);
            assert_eq!(k % 2, 1, "kernel for {v} is even");
            assert!(k >= 3, "kernel for {v} is below 3");
        }
    }

    #[test]
    fn blur_kernel_grows_with_intensity() {
        assert_eq!(blur_kernel_size(2), 3);
        assert_eq!(blur_kernel_size(3), 3);
        assert_eq!(blur_kernel_size(5), 5);
        assert_eq!(blur_kernel_size(9), 9);
        assert!(blur_kernel_size(10) > blur_kernel_size(1));
    }

    #[test]
    fn gaussian_kernels_are_normalized() {
        for k in [3, 5, 7, 9, 11] {
            let kernel = gaussian_kernel(k);
            assert_eq!(kernel.len(), k as usize);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "kernel {k} sums to {sum}");
        }
    }

    #[test]
    fn gaussian_kernels_are_symmetric() {
        let kernel = gaussian_kernel(11);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-7);
        }
        // Peak in the middle
        assert!(kernel[5] > kernel[4]);
    }

    #[test]
    fn sigma_for_kernel_size() {
        assert!((gaussian_sigma(3) - 0.8).abs() < 1e-9);
        assert!((gaussian_sigma(9) - 1.7).abs() < 1e-9);
    }

    #[test]
    fn fit_within_landscape_into_box() {
        // 1280x720 into 500x350 → width-bound
        assert_eq!(fit_within((1280, 720), (500, 350)), (500, 281));
    }

    #[test]
    fn fit_within_portrait_into_box() {
        assert_eq!(fit_within((600, 800), (500, 350)), (263, 350));
    }

    #[test]
    fn fit_within_upscales_small_sources() {
        assert_eq!(fit_within((100, 70), (500, 350)), (500, 350));
    }

    #[test]
    fn fit_within_degenerate() {
        assert_eq!(fit_within((0, 10), (500, 350)), (0, 0));
        assert_eq!(fit_within((10, 10), (0, 350)), (0, 0));
    }
}
