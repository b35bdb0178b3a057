//! Capture devices and render sinks.
//!
//! The booth never talks to a camera API directly. It polls a
//! [`CaptureDevice`] for frames and hands whatever should be on screen to a
//! [`FrameSink`]. Hosts plug in their own implementations; two devices ship
//! with the crate:
//!
//! | Device | Frames |
//! |---|---|
//! | [`FrameDirectory`] | Image files from a directory, in name order, looping |
//! | [`TestPattern`] | Synthetic moving color bars |
//! | [`Disconnected`] | None; for hosts that only manage the photo list |

use crate::imaging::{self, Image};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A source of frames, polled once per tick.
pub trait CaptureDevice {
    /// Read the next frame. `None` means this read failed; the next one may succeed.
    fn read(&mut self) -> Option<Image>;

    /// Give the device back. Called once when its owner shuts down.
    fn release(&mut self) {}
}

/// Where rendered frames go. The GUI shell (or a file writer) implements this.
pub trait FrameSink {
    fn render(&mut self, image: &Image);
}

/// Replays the supported images of a directory as a looping frame stream.
pub struct FrameDirectory {
    frames: Vec<PathBuf>,
    next: usize,
}

impl FrameDirectory {
    /// Collect every decodable image directly inside `dir`, sorted by name.
    pub fn open(dir: &Path) -> std::io::Result<Self> {
        let mut frames = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::other)?;
            if entry.file_type().is_file() && imaging::is_supported(entry.path()) {
                frames.push(entry.into_path());
            }
        }
        debug!(dir = %dir.display(), frames = frames.len(), "opened frame directory");
        Ok(Self { frames, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl CaptureDevice for FrameDirectory {
    fn read(&mut self) -> Option<Image> {
        if self.frames.is_empty() {
            return None;
        }
        let path = &self.frames[self.next];
        self.next = (self.next + 1) % self.frames.len();
        match imaging::decode(path) {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!("frame read failed: {e}");
                None
            }
        }
    }

    fn release(&mut self) {
        debug!("frame directory released");
        self.frames.clear();
    }
}

/// Synthetic device: vertical color bars that scroll one step per frame.
pub struct TestPattern {
    width: u32,
    height: u32,
    frame: u32,
}

const BARS: [[u8; 3]; 7] = [
    [192, 192, 192],
    [192, 192, 0],
    [0, 192, 192],
    [0, 192, 0],
    [192, 0, 192],
    [192, 0, 0],
    [0, 0, 192],
];

impl TestPattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame: 0,
        }
    }
}

impl CaptureDevice for TestPattern {
    fn read(&mut self) -> Option<Image> {
        let offset = self.frame;
        self.frame = self.frame.wrapping_add(1);
        let bar_width = (self.width / BARS.len() as u32).max(1);
        Some(Image::from_fn(self.width, self.height, |x, _| {
            let bar = (x.wrapping_add(offset) / bar_width) as usize % BARS.len();
            image::Rgb(BARS[bar])
        }))
    }
}

/// A device that never produces a frame.
pub struct Disconnected;

impl CaptureDevice for Disconnected {
    fn read(&mut self) -> Option<Image> {
        None
    }
}
