//! Shared test utilities for the photo-lab test suite.
//!
//! Provides synthetic image builders, pixel assertions, and a scripted capture
//! device that records what the manager asked of it.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = uniform_image(10, 10, [128, 128, 128]);
//! let out = apply(Some(&img), &filters).unwrap();
//! assert_uniform(&out, [178, 178, 178]);
//!
//! let (tmp, mut manager, log) = manager_with_frames(vec![Some(gradient_image(8, 6))]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

use crate::capture::CaptureDevice;
use crate::config::BoothConfig;
use crate::imaging::Image;
use crate::manager::PhotoManager;

// =========================================================================
// Synthetic images
// =========================================================================

/// Image where every pixel is `rgb`.
pub fn uniform_image(width: u32, height: u32, rgb: [u8; 3]) -> Image {
    Image::from_pixel(width, height, image::Rgb(rgb))
}

/// Image with distinct, deterministic values per pixel and channel.
pub fn gradient_image(width: u32, height: u32) -> Image {
    Image::from_fn(width, height, |x, y| {
        image::Rgb([
            ((x * 255) / width.max(1)) as u8,
            ((y * 255) / height.max(1)) as u8,
            ((x * 7 + y * 13) % 256) as u8,
        ])
    })
}

/// Assert every pixel equals `rgb`. Panics with the first offending pixel.
pub fn assert_uniform(image: &Image, rgb: [u8; 3]) {
    for (x, y, px) in image.enumerate_pixels() {
        assert_eq!(px.0, rgb, "pixel ({x}, {y}) differs");
    }
}

// =========================================================================
// Scripted capture device
// =========================================================================

/// What the manager did with a [`ScriptedDevice`].
#[derive(Debug, Default)]
pub struct DeviceLog {
    pub reads: usize,
    pub released: bool,
}

/// Capture device that plays back a fixed script of frames.
///
/// `None` entries simulate a failed read. Once the script runs out every read
/// fails. The shared [`DeviceLog`] stays readable after the manager takes
/// ownership of the device.
pub struct ScriptedDevice {
    frames: std::collections::VecDeque<Option<Image>>,
    log: Rc<RefCell<DeviceLog>>,
}

impl ScriptedDevice {
    pub fn new(frames: Vec<Option<Image>>) -> (Self, Rc<RefCell<DeviceLog>>) {
        let log = Rc::new(RefCell::new(DeviceLog::default()));
        let device = Self {
            frames: frames.into(),
            log: Rc::clone(&log),
        };
        (device, log)
    }
}

impl CaptureDevice for ScriptedDevice {
    fn read(&mut self) -> Option<Image> {
        self.log.borrow_mut().reads += 1;
        self.frames.pop_front().flatten()
    }

    fn release(&mut self) {
        self.log.borrow_mut().released = true;
    }
}

/// Open a manager on a fresh temp library with a scripted device.
pub fn manager_with_frames(
    frames: Vec<Option<Image>>,
) -> (TempDir, PhotoManager<ScriptedDevice>, Rc<RefCell<DeviceLog>>) {
    let tmp = TempDir::new().unwrap();
    let (device, log) = ScriptedDevice::new(frames);
    let manager = PhotoManager::open(tmp.path(), device, &BoothConfig::default()).unwrap();
    (tmp, manager, log)
}

/// Write a real image file outside the library, for import tests.
pub fn write_external_photo(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    crate::imaging::encode(&gradient_image(16, 12), &path, 90).unwrap();
    path
}
