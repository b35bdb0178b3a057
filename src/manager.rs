//! The photo list and the capture device that feeds it.
//!
//! [`PhotoManager`] owns the ordered list of [`PhotoRecord`]s for one library
//! directory together with the [`CaptureDevice`] used to take new photos.
//! It is a small state machine driven by the host:
//!
//! ```text
//!            capture()                 show_selected()
//!   Live ───────────────▶ Frozen     Live ───────────────▶ Paused
//!    ▲                      │          ▲                      │
//!    └── confirm()/discard()┘          └────── resume() ──────┘
//! ```
//!
//! - **Live**: every [`tick`](PhotoManager::tick) reads one frame and renders it.
//! - **Frozen**: a captured frame waits for confirm or discard; ticks do nothing.
//! - **Paused**: a stored photo is on screen; ticks do nothing.
//!
//! ## Failure rules
//!
//! Every mutating operation writes first (photo file, then `library.json`) and
//! only touches the in-memory list once the writes succeeded. Delete saves
//! the list before removing the captured file. A failed operation leaves the
//! list, the files, the mode and any pending frame as they were.

use crate::capture::{CaptureDevice, FrameSink};
use crate::config::BoothConfig;
use crate::imaging::{self, CodecError, Image};
use crate::library;
use crate::naming::next_captured_name;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub use crate::library::{Origin, PhotoRecord};

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("Capture device returned no frame")]
    DeviceRead,
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("Cannot update library manifest: {0}")]
    Manifest(io::Error),
    #[error("No captured photo is waiting for confirmation")]
    NotFrozen,
    #[error("A captured photo is still waiting for confirm or discard")]
    PendingCapture,
    /// Carries the 0-based index; the message shows the 1-based position.
    #[error("No photo at position {}", .0 + 1)]
    NoSuchRecord(usize),
    #[error("Unsupported image file: {0}")]
    Unsupported(PathBuf),
}

/// Externally visible state of a [`PhotoManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Frozen,
    Paused,
}

enum State {
    Live,
    Frozen { pending: Image },
    Paused,
}

/// Ordered photo list of one library directory plus its capture device.
pub struct PhotoManager<D: CaptureDevice> {
    dir: PathBuf,
    device: D,
    records: Vec<PhotoRecord>,
    state: State,
    selected: Option<usize>,
    photo_prefix: String,
    extension: String,
    jpeg_quality: u8,
    display_bounds: (u32, u32),
}

impl<D: CaptureDevice> PhotoManager<D> {
    /// Open the library at `dir`, creating the directory if needed.
    ///
    /// The directory is canonicalized so that the paths written to
    /// `library.json` do not depend on the working directory.
    pub fn open(dir: &Path, device: D, config: &BoothConfig) -> Result<Self, PhotoError> {
        let io_err = |source| PhotoError::Io {
            path: dir.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(dir).map_err(io_err)?;
        let dir = std::fs::canonicalize(dir).map_err(io_err)?;
        let records = library::load(&dir, &config.library.photo_prefix);
        debug!(dir = %dir.display(), records = records.len(), "opened library");
        Ok(Self {
            dir,
            device,
            records,
            state: State::Live,
            selected: None,
            photo_prefix: config.library.photo_prefix.clone(),
            extension: config.library.extension.clone(),
            jpeg_quality: config.library.jpeg_quality,
            display_bounds: config.display.bounds(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Result<&PhotoRecord, PhotoError> {
        self.records.get(index).ok_or(PhotoError::NoSuchRecord(index))
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            State::Live => Mode::Live,
            State::Frozen { .. } => Mode::Frozen,
            State::Paused => Mode::Paused,
        }
    }

    /// The captured frame waiting for confirm or discard.
    pub fn pending(&self) -> Option<&Image> {
        match &self.state {
            State::Frozen { pending } => Some(pending),
            _ => None,
        }
    }

    // ---------------------------------------------------------------------
    // Streaming and capture
    // ---------------------------------------------------------------------

    /// One refresh step. While Live, reads a frame and renders it fitted to
    /// the display box. Returns whether anything was rendered.
    ///
    /// A failed device read is skipped; the next tick tries again.
    pub fn tick(&mut self, sink: &mut impl FrameSink) -> bool {
        if !matches!(self.state, State::Live) {
            return false;
        }
        match self.device.read() {
            Some(frame) => {
                sink.render(&imaging::fit_for_display(&frame, self.display_bounds));
                true
            }
            None => {
                debug!("device read failed, skipping tick");
                false
            }
        }
    }

    /// Take one frame from the device and hold it as the pending photo.
    ///
    /// Allowed while Live or Paused. On a failed read the mode is unchanged.
    pub fn capture(&mut self) -> Result<&Image, PhotoError> {
        if matches!(self.state, State::Frozen { .. }) {
            return Err(PhotoError::PendingCapture);
        }
        let frame = self.device.read().ok_or(PhotoError::DeviceRead)?;
        debug!(width = frame.width(), height = frame.height(), "captured frame");
        self.state = State::Frozen { pending: frame };
        self.pending().ok_or(PhotoError::NotFrozen)
    }

    /// Persist the pending frame as a new captured photo and append it.
    pub fn confirm(&mut self) -> Result<PhotoRecord, PhotoError> {
        let State::Frozen { pending } = &self.state else {
            return Err(PhotoError::NotFrozen);
        };

        let name = next_captured_name(
            &self.photo_prefix,
            self.records.len(),
            &self.extension,
            |candidate| {
                let path = self.dir.join(candidate);
                path.exists() || self.records.iter().any(|r| r.path == path)
            },
        );
        let path = self.dir.join(&name);
        if let Err(e) = imaging::encode(pending, &path, self.jpeg_quality) {
            let _ = std::fs::remove_file(&path);
            return Err(e.into());
        }

        let record = PhotoRecord {
            path: path.clone(),
            origin: Origin::Captured,
        };
        let mut records = self.records.clone();
        records.push(record.clone());
        if let Err(e) = library::save(&self.dir, &records) {
            let _ = std::fs::remove_file(&path);
            return Err(PhotoError::Manifest(e));
        }

        self.records = records;
        self.state = State::Live;
        info!(path = %path.display(), "saved captured photo");
        Ok(record)
    }

    /// Drop the pending frame and go back to streaming. No-op unless Frozen.
    pub fn discard(&mut self) {
        if matches!(self.state, State::Frozen { .. }) {
            debug!("discarded captured frame");
            self.state = State::Live;
        }
    }

    /// Leave Paused and stream again. No-op in any other mode.
    pub fn resume(&mut self) {
        if matches!(self.state, State::Paused) {
            self.state = State::Live;
        }
    }

    // ---------------------------------------------------------------------
    // List operations
    // ---------------------------------------------------------------------

    /// Register an existing image file without copying it.
    pub fn import(&mut self, path: &Path) -> Result<PhotoRecord, PhotoError> {
        let record = imported_record(path)?;
        let mut records = self.records.clone();
        records.push(record.clone());
        self.commit(records)?;
        info!(path = %path.display(), "imported photo");
        Ok(record)
    }

    /// Import every supported image under `dir`, recursively, in path order.
    ///
    /// All files are added with one manifest write; nothing is added if any
    /// entry cannot be read.
    pub fn import_dir(&mut self, dir: &Path) -> Result<Vec<PhotoRecord>, PhotoError> {
        let mut added = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| PhotoError::Io {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: e.into(),
            })?;
            if entry.file_type().is_file() && imaging::is_supported(entry.path()) {
                added.push(imported_record(entry.path())?);
            }
        }
        if added.is_empty() {
            debug!(dir = %dir.display(), "no supported images to import");
            return Ok(added);
        }

        let mut records = self.records.clone();
        records.extend(added.iter().cloned());
        self.commit(records)?;
        info!(dir = %dir.display(), count = added.len(), "imported directory");
        Ok(added)
    }

    /// Copy the backing file of record `index` to `dest`, byte for byte.
    pub fn export(&self, index: usize, dest: &Path) -> Result<(), PhotoError> {
        let source = &self.record(index)?.path;
        std::fs::metadata(source).map_err(|e| PhotoError::Io {
            path: source.clone(),
            source: e,
        })?;
        std::fs::copy(source, dest).map_err(|e| PhotoError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        info!(from = %source.display(), to = %dest.display(), "exported photo");
        Ok(())
    }

    /// Remove record `index` from the list.
    ///
    /// Captured photos are deleted from disk once the shorter list is saved;
    /// imported files are left alone. A captured file that cannot be removed
    /// is logged and otherwise ignored, since the record is already gone.
    pub fn delete(&mut self, index: usize) -> Result<PhotoRecord, PhotoError> {
        let record = self.record(index)?.clone();
        let mut records = self.records.clone();
        records.remove(index);
        self.commit(records)?;
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };

        if record.origin == Origin::Captured {
            match std::fs::remove_file(&record.path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(path = %record.path.display(), "captured photo already missing");
                }
                Err(e) => {
                    warn!(path = %record.path.display(), "cannot remove captured photo: {e}");
                }
            }
        }
        info!(path = %record.path.display(), origin = ?record.origin, "deleted photo");
        Ok(record)
    }

    /// Decode the backing file of record `index` and make it the selection.
    pub fn select(&mut self, index: usize) -> Result<Image, PhotoError> {
        let image = imaging::decode(&self.record(index)?.path)?;
        self.selected = Some(index);
        Ok(image)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Set or clear the selection without decoding anything.
    pub fn set_selection(&mut self, index: Option<usize>) -> Result<(), PhotoError> {
        if let Some(i) = index {
            self.record(i)?;
        }
        self.selected = index;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Operations on the selection. With nothing selected they do nothing
    // and return Ok(None).
    // ---------------------------------------------------------------------

    /// Render the selected photo and pause streaming.
    pub fn show_selected(
        &mut self,
        sink: &mut impl FrameSink,
    ) -> Result<Option<&PhotoRecord>, PhotoError> {
        let Some(index) = self.selected_or_log("show") else {
            return Ok(None);
        };
        if matches!(self.state, State::Frozen { .. }) {
            return Err(PhotoError::PendingCapture);
        }
        let image = imaging::decode(&self.record(index)?.path)?;
        sink.render(&imaging::fit_for_display(&image, self.display_bounds));
        self.state = State::Paused;
        Ok(self.records.get(index))
    }

    pub fn export_selected(&self, dest: &Path) -> Result<Option<()>, PhotoError> {
        match self.selected_or_log("export") {
            Some(index) => self.export(index, dest).map(Some),
            None => Ok(None),
        }
    }

    pub fn delete_selected(&mut self) -> Result<Option<PhotoRecord>, PhotoError> {
        match self.selected_or_log("delete") {
            Some(index) => self.delete(index).map(Some),
            None => Ok(None),
        }
    }

    fn selected_or_log(&self, action: &str) -> Option<usize> {
        if self.selected.is_none() {
            debug!("{action}: no photo selected");
        }
        self.selected
    }

    fn commit(&mut self, records: Vec<PhotoRecord>) -> Result<(), PhotoError> {
        library::save(&self.dir, &records).map_err(PhotoError::Manifest)?;
        self.records = records;
        Ok(())
    }
}

impl<D: CaptureDevice> Drop for PhotoManager<D> {
    fn drop(&mut self) {
        self.device.release();
    }
}

/// Validate `path` and record it by its absolute location.
fn imported_record(path: &Path) -> Result<PhotoRecord, PhotoError> {
    let io_err = |source| PhotoError::Io {
        path: path.to_path_buf(),
        source,
    };
    let absolute = std::fs::canonicalize(path).map_err(io_err)?;
    let meta = std::fs::metadata(&absolute).map_err(io_err)?;
    if !meta.is_file() || !imaging::is_supported(&absolute) {
        return Err(PhotoError::Unsupported(path.to_path_buf()));
    }
    Ok(PhotoRecord {
        path: absolute,
        origin: Origin::Imported,
    })
}
