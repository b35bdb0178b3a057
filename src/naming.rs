//! File naming for captured photos.
//!
//! Captured photos are named `<prefix><position>.<extension>`, where the
//! position is the list length at the moment of capture:
//! - first capture into an empty list → `photo_0.jpg`
//! - capture after three photos → `photo_3.jpg`
//!
//! Deleting shrinks the list, so a fresh position can collide with a file that
//! is still listed. [`next_captured_name`] walks forward past taken names.

/// Result of parsing a captured photo file name like `photo_12.jpg`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// List position the photo was captured at.
    pub position: usize,
    /// Extension without the dot, as written.
    pub extension: String,
}

/// Build the file name for a capture at `position`.
pub fn captured_name(prefix: &str, position: usize, extension: &str) -> String {
    format!("{prefix}{position}.{extension}")
}

/// Parse a captured photo name following the `<prefix><N>.<ext>` convention.
///
/// Handles these patterns (prefix `photo_`):
/// - `"photo_0.jpg"` → position=0, extension="jpg"
/// - `"photo_12.PNG"` → position=12, extension="PNG"
/// - `"photo_.jpg"`, `"photo_x.jpg"`, `"holiday.jpg"` → `None`
pub fn parse_captured_name(prefix: &str, name: &str) -> Option<ParsedName> {
    let rest = name.strip_prefix(prefix)?;
    let (number, extension) = rest.rsplit_once('.')?;
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) || extension.is_empty() {
        return None;
    }
    Some(ParsedName {
        position: number.parse().ok()?,
        extension: extension.to_string(),
    })
}

/// First captured name at or after `position` for which `taken` is false.
pub fn next_captured_name(
    prefix: &str,
    position: usize,
    extension: &str,
    taken: impl Fn(&str) -> bool,
) -> String {
    (position..)
        .map(|p| captured_name(prefix, p, extension))
        .find(|name| !taken(name))
        .expect("an unbounded range always has a free name")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_name_format() {
        assert_eq!(captured_name("photo_", 0, "jpg"), "photo_0.jpg");
        assert_eq!(captured_name("booth-", 17, "png"), "booth-17.png");
    }

    #[test]
    fn parse_simple() {
        let p = parse_captured_name("photo_", "photo_3.jpg").unwrap();
        assert_eq!(p.position, 3);
        assert_eq!(p.extension, "jpg");
    }

    #[test]
    fn parse_keeps_extension_case() {
        let p = parse_captured_name("photo_", "photo_12.PNG").unwrap();
        assert_eq!(p.position, 12);
        assert_eq!(p.extension, "PNG");
    }

    #[test]
    fn parse_rejects_missing_number() {
        assert_eq!(parse_captured_name("photo_", "photo_.jpg"), None);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert_eq!(parse_captured_name("photo_", "photo_x1.jpg"), None);
        assert_eq!(parse_captured_name("photo_", "photo_-1.jpg"), None);
    }

    #[test]
    fn parse_rejects_other_prefix() {
        assert_eq!(parse_captured_name("photo_", "holiday.jpg"), None);
    }

    #[test]
    fn parse_rejects_missing_extension() {
        assert_eq!(parse_captured_name("photo_", "photo_4"), None);
        assert_eq!(parse_captured_name("photo_", "photo_4."), None);
    }

    #[test]
    fn next_name_uses_position_when_free() {
        let name = next_captured_name("photo_", 2, "jpg", |_| false);
        assert_eq!(name, "photo_2.jpg");
    }

    #[test]
    fn next_name_skips_taken() {
        let taken = ["photo_1.jpg", "photo_2.jpg"];
        let name = next_captured_name("photo_", 1, "jpg", |n| taken.contains(&n));
        assert_eq!(name, "photo_3.jpg");
    }
}
