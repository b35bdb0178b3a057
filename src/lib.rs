//! # Photo Lab
//!
//! The core of a webcam photo booth: take photos from a capture device, keep
//! them as an ordered list of files, and run simple filters over them. The
//! window, the camera driver and the image codecs belong to the host; this
//! crate only needs "give me a frame" and "render this image".
//!
//! # Architecture: Two Components, One Direction
//!
//! ```text
//! CaptureDevice ──▶ PhotoManager ──▶ Session ──▶ Filter Pipeline ──▶ FrameSink
//!                   (photo list)     (source,     (FilterSet in
//!                                     derived,     fixed order)
//!                                     original)
//! ```
//!
//! The [`manager::PhotoManager`] supplies a source image (a captured frame or
//! a stored photo). A [`session::Session`] feeds it through
//! [`imaging::apply`] and keeps the result for display. Nothing flows back
//! except an explicit revert.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Filter pipeline, filters, effects, decode/encode, display fitting |
//! | [`manager`] | Photo list state machine: capture, confirm, import, export, delete, select |
//! | [`session`] | Source / derived / original images for one processing view |
//! | [`capture`] | `CaptureDevice` and `FrameSink` seams plus two bundled devices |
//! | [`library`] | `library.json` persistence of the photo list |
//! | [`naming`] | `photo_<n>.jpg` naming convention for captured photos |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Hosts Drive, The Core Reacts
//!
//! There is no event loop and no timer in the library. A host calls
//! [`manager::PhotoManager::tick`] on whatever schedule it likes and maps
//! button presses to plain method calls. The CLI ticks from a sleep loop; a
//! GUI would tick from its refresh timer. The same core serves both.
//!
//! ## Filters Re-Run From The Source
//!
//! A [`imaging::FilterSet`] holds exactly one selection per filter kind and
//! always iterates in pipeline order: grayscale, blur, brightness, contrast,
//! sharpen, saturation. Every change re-runs the whole set over the untouched
//! source. Selecting "saturation then grayscale" and "grayscale then
//! saturation" gives the same picture, and revert is free: the original was
//! never written to.
//!
//! ## Grayscale Stays Three-Channel
//!
//! Grayscale writes the luminance into all three channels instead of
//! collapsing to one. Filters after it never need to know it ran. Saturation
//! after grayscale sees hue 0 everywhere, so it tints the gray image red.
//!
//! ## Write, Then Mutate
//!
//! Confirm and import write the photo file and `library.json` before touching
//! the in-memory list. Delete saves the shorter list first and only then
//! removes a captured file. A failure leaves the manager and the disk exactly
//! as they were, including any frame still waiting for confirmation.
//! Library paths are stored absolute, so any working directory sees the same
//! files.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, encoding, resampling and edge detection use the `image` and
//! `imageproc` crates. Convolutions go through `imageproc::filter`; the
//! per-pixel tone filters are loops over `RgbImage` parallelized with `rayon`. There is no OpenCV and no system library to
//! install.

pub mod capture;
pub mod config;
pub mod imaging;
pub mod library;
pub mod manager;
pub mod naming;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
