//! Image processing in pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate (JPEG, PNG, TIFF, WebP in; JPEG, PNG out) |
//! | **Filters** | hand-written pixel loops parallelized with `rayon` |
//! | **Contour** | `imageproc::edges::canny` |
//! | **Display fit** | `image::imageops::resize` (bilinear) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for kernel sizes and fit math (unit testable)
//! - **Parameters**: [`FilterKind`], [`Intensity`], [`FilterSpec`], [`FilterSet`]
//! - **Filters**: One function per filter kind
//! - **Pipeline**: [`apply`] runs a [`FilterSet`] in declared order
//! - **Effects**: Chainable one-shot [`Effect`]s (contour, color map, mirror)
//! - **Codec**: File decode/encode
//! - **Operations**: Display fit and working-size helpers

mod calculations;
pub mod codec;
pub mod effects;
pub mod filters;
pub mod operations;
mod params;
pub mod pipeline;

/// Pixel buffer used everywhere: 8-bit RGB, row-major, no padding.
pub type Image = image::RgbImage;

pub use calculations::{blur_kernel_size, fit_within};
pub use codec::{CodecError, decode, dimensions, encode, is_supported, supported_input_extensions};
pub use effects::Effect;
pub use operations::{fit_for_display, working_copy};
pub use params::{FilterKind, FilterSet, FilterSpec, Intensity};
pub use pipeline::apply;
