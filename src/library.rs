//! On-disk photo list for the library directory.
//!
//! The list the [`PhotoManager`](crate::manager::PhotoManager) maintains is
//! persisted as `library.json` so that separate CLI invocations see the same
//! photos in the same order:
//!
//! ```json
//! {
//!   "version": 1,
//!   "records": [
//!     { "path": "/home/me/booth/photos/photo_0.jpg", "origin": "captured" },
//!     { "path": "/home/me/Pictures/beach.png", "origin": "imported" }
//!   ]
//! }
//! ```
//!
//! ## Loading rules
//!
//! - Missing manifest → the directory is scanned for captured photo names
//!   (`photo_0.jpg`, `photo_1.jpg`, ...) which are adopted in position order.
//!   Imported files cannot be rediscovered.
//! - Unparseable manifest or version mismatch → empty list, with a warning.
//!   The broken file is left alone until the next successful save.

use crate::imaging;
use crate::naming::parse_captured_name;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Name of the list manifest within the library directory.
pub const MANIFEST_FILENAME: &str = "library.json";

/// Version of the manifest format. Bump when the layout changes.
const MANIFEST_VERSION: u32 = 1;

/// How a photo entered the list. Decides whether deleting it removes the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Written by the booth; owned by the library.
    Captured,
    /// Registered from elsewhere; never deleted from disk.
    Imported,
}

/// One entry of the photo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub origin: Origin,
}

impl PhotoRecord {
    /// File name for display; falls back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    records: Vec<PhotoRecord>,
}

/// Load the photo list from `dir`. See the [module docs](self) for the rules.
pub fn load(dir: &Path, photo_prefix: &str) -> Vec<PhotoRecord> {
    let path = dir.join(MANIFEST_FILENAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return recover_captured(dir, photo_prefix);
        }
        Err(e) => {
            warn!("cannot read {}: {e}; starting with an empty list", path.display());
            return Vec::new();
        }
    };
    match serde_json::from_str::<Manifest>(&content) {
        Ok(m) if m.version == MANIFEST_VERSION => m.records,
        Ok(m) => {
            warn!(
                "{} has version {}, expected {MANIFEST_VERSION}; starting with an empty list",
                path.display(),
                m.version
            );
            Vec::new()
        }
        Err(e) => {
            warn!("cannot parse {}: {e}; starting with an empty list", path.display());
            Vec::new()
        }
    }
}

/// Write the photo list to `dir`.
///
/// Writes a sibling temp file first and renames it over the manifest, so a
/// failed write leaves the previous list intact.
pub fn save(dir: &Path, records: &[PhotoRecord]) -> io::Result<()> {
    let manifest = Manifest {
        version: MANIFEST_VERSION,
        records: records.to_vec(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    let path = dir.join(MANIFEST_FILENAME);
    let tmp = dir.join(format!(".{MANIFEST_FILENAME}.tmp"));
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, &path)
}

/// Adopt captured photos found directly in `dir`, ordered by position.
fn recover_captured(dir: &Path, photo_prefix: &str) -> Vec<PhotoRecord> {
    let mut found: Vec<(usize, PathBuf)> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && imaging::is_supported(e.path()))
        .filter_map(|e| {
            let name = e.file_name().to_str()?;
            let parsed = parse_captured_name(photo_prefix, name)?;
            Some((parsed.position, e.into_path()))
        })
        .collect();
    found.sort();

    if !found.is_empty() {
        info!(count = found.len(), "adopted captured photos without a manifest");
    }
    found
        .into_iter()
        .map(|(_, path)| PhotoRecord {
            path,
            origin: Origin::Captured,
        })
        .collect()
}
