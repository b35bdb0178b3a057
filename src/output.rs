//! CLI output formatting for every subcommand.
//!
//! # Information-First Display
//!
//! Each photo leads with its 1-based list position and file name, the same
//! position the CLI accepts as an argument. The full path follows as an
//! indented `Source:` line so the listing doubles as a map back to disk.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Photos (2)
//! 001 photo_0.jpg (captured)
//!     Source: photos/photo_0.jpg
//! 002 beach.png (imported)
//!     Source: /home/me/Pictures/beach.png
//! ```
//!
//! ## Capture / import / export / delete
//!
//! ```text
//! Captured 003 photo_2.jpg
//!     Source: photos/photo_2.jpg
//! Exported 001 photo_0.jpg
//!     Source: photos/photo_0.jpg
//!     To: /tmp/keep.jpg
//! ```
//!
//! ## Apply
//!
//! ```text
//! photo_0.jpg (640x480)
//!     grayscale 1
//!     blur 3
//!     contour
//!     Wrote: out.jpg
//! ```
//!
//! # Architecture
//!
//! Each subcommand has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O and no side effects.

use crate::imaging::{Effect, FilterSet};
use crate::library::{Origin, PhotoRecord};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn origin_label(origin: Origin) -> &'static str {
    match origin {
        Origin::Captured => "captured",
        Origin::Imported => "imported",
    }
}

/// Header line plus indented source for one record at 0-based `index`.
fn record_lines(index: usize, record: &PhotoRecord, show_origin: bool) -> Vec<String> {
    let header = if show_origin {
        format!(
            "{} {} ({})",
            format_index(index + 1),
            record.display_name(),
            origin_label(record.origin)
        )
    } else {
        format!("{} {}", format_index(index + 1), record.display_name())
    };
    vec![header, format!("    Source: {}", record.path.display())]
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// List
// ============================================================================

pub fn format_records(records: &[PhotoRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec!["No photos".to_string()];
    }
    let mut lines = vec![format!("Photos ({})", records.len())];
    for (i, record) in records.iter().enumerate() {
        lines.extend(record_lines(i, record, true));
    }
    lines
}

pub fn print_records(records: &[PhotoRecord]) {
    print_lines(format_records(records));
}

// ============================================================================
// Single-record actions
// ============================================================================

/// One action on one record, e.g. `Deleted 002 beach.png`.
pub fn format_record_action(action: &str, index: usize, record: &PhotoRecord) -> Vec<String> {
    let mut lines = record_lines(index, record, false);
    lines[0] = format!("{} {}", action, lines[0]);
    lines
}

pub fn print_record_action(action: &str, index: usize, record: &PhotoRecord) {
    print_lines(format_record_action(action, index, record));
}

/// `Exported 001 photo_0.jpg` plus the destination.
pub fn format_export(index: usize, record: &PhotoRecord, dest: &Path) -> Vec<String> {
    let mut lines = format_record_action("Exported", index, record);
    lines.push(format!("    To: {}", dest.display()));
    lines
}

pub fn print_export(index: usize, record: &PhotoRecord, dest: &Path) {
    print_lines(format_export(index, record, dest));
}

/// `show` output: the record plus what was decoded.
pub fn format_show(
    index: usize,
    record: &PhotoRecord,
    dimensions: (u32, u32),
    preview: Option<&Path>,
) -> Vec<String> {
    let mut lines = record_lines(index, record, true);
    lines.push(format!("    Size: {}x{}", dimensions.0, dimensions.1));
    if let Some(p) = preview {
        lines.push(format!("    Preview: {}", p.display()));
    }
    lines
}

pub fn print_show(
    index: usize,
    record: &PhotoRecord,
    dimensions: (u32, u32),
    preview: Option<&Path>,
) {
    print_lines(format_show(index, record, dimensions, preview));
}

// ============================================================================
// Capture
// ============================================================================

/// Summary of a `capture` run. `saved` is `None` when the frame was discarded.
pub fn format_capture(
    rendered: usize,
    ticks: usize,
    saved: Option<(usize, &PhotoRecord)>,
) -> Vec<String> {
    let mut lines = vec![format!("Live: {} of {} frames rendered", rendered, ticks)];
    match saved {
        Some((index, record)) => lines.extend(format_record_action("Captured", index, record)),
        None => lines.push("Discarded captured frame".to_string()),
    }
    lines
}

pub fn print_capture(rendered: usize, ticks: usize, saved: Option<(usize, &PhotoRecord)>) {
    print_lines(format_capture(rendered, ticks, saved));
}

// ============================================================================
// Apply
// ============================================================================

/// What an `apply` run did, in order.
pub struct ApplySummary<'a> {
    pub input: &'a str,
    pub dimensions: (u32, u32),
    pub filters: &'a FilterSet,
    pub effects: &'a [Effect],
    pub reverted: bool,
    pub output: &'a Path,
}

pub fn format_apply(summary: &ApplySummary) -> Vec<String> {
    let (w, h) = summary.dimensions;
    let mut lines = vec![format!("{} ({}x{})", summary.input, w, h)];
    if summary.reverted {
        lines.push("    reverted to original".to_string());
    } else {
        for spec in summary.filters.enabled() {
            lines.push(format!("    {} {}", spec.kind, spec.intensity.value()));
        }
        for effect in summary.effects {
            lines.push(format!("    {}", effect_label(*effect)));
        }
        if summary.filters.is_identity() && summary.effects.is_empty() {
            lines.push("    (no changes)".to_string());
        }
    }
    lines.push(format!("    Wrote: {}", summary.output.display()));
    lines
}

pub fn print_apply(summary: &ApplySummary) {
    print_lines(format_apply(summary));
}

fn effect_label(effect: Effect) -> &'static str {
    match effect {
        Effect::Contour => "contour",
        Effect::ColorMap => "color map",
        Effect::Mirror => "mirror",
    }
}

// ============================================================================
// Tests
// ============================================================================
