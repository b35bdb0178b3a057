//! Reading and writing image files with the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` with explicit quality |
//! | Encode PNG | `image::codecs::png::PngEncoder` |
//!
//! Everything decoded is converted to 8-bit RGB, the pipeline's only pixel format.

use super::Image;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// True if `path` has an extension we can decode.
pub fn is_supported(path: &Path) -> bool {
    let ext = extension_of(path);
    supported_input_extensions().contains(&ext.as_str())
}

/// Decode an image file into RGB8, sniffing the format from its content.
pub fn decode(path: &Path) -> Result<Image, CodecError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let decoded = reader.decode().map_err(|source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.to_rgb8())
}

/// Width and height of an image file, read from its header only.
pub fn dimensions(path: &Path) -> Result<(u32, u32), CodecError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    reader.into_dimensions().map_err(|source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode `image` to `path`, choosing the format from the extension.
///
/// `quality` (1-100) only matters for JPEG.
pub fn encode(image: &Image, path: &Path, quality: u8) -> Result<(), CodecError> {
    let ext = extension_of(path);
    if !matches!(ext.as_str(), "jpg" | "jpeg" | "png") {
        return Err(CodecError::UnsupportedFormat(ext));
    }

    let io_err = |source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    };
    let encode_err = |source| CodecError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let (width, height) = image.dimensions();

    match ext.as_str() {
        "png" => PngEncoder::new(&mut writer)
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(encode_err)?,
        _ => JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100))
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(encode_err)?,
    }

    // Dropping the writer would flush silently; surface the error instead
    writer.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_image, uniform_image};

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn is_supported_ignores_case() {
        assert!(is_supported(Path::new("/a/b/Holiday.JPG")));
        assert!(is_supported(Path::new("scan.png")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no-extension")));
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("frame.png");
        let img = gradient_image(17, 11);

        encode(&img, &path, 90).unwrap();
        assert_eq!(decode(&path).unwrap(), img);
    }

    #[test]
    fn jpeg_keeps_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("photo_0.jpg");

        encode(&uniform_image(40, 30, [10, 200, 90]), &path, 95).unwrap();
        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }

    #[test]
    fn decode_sniffs_content_not_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let png = tmp.path().join("real.png");
        encode(&gradient_image(4, 4), &png, 90).unwrap();
        let disguised = tmp.path().join("disguised.jpg");
        std::fs::copy(&png, &disguised).unwrap();

        assert_eq!(decode(&disguised).unwrap(), gradient_image(4, 4));
    }

    #[test]
    fn dimensions_read_from_header() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("wide.jpg");
        encode(&uniform_image(64, 20, [1, 2, 3]), &path, 90).unwrap();

        assert_eq!(dimensions(&path).unwrap(), (64, 20));
        assert!(matches!(
            dimensions(&tmp.path().join("missing.png")),
            Err(CodecError::Io { .. })
        ));
    }

    #[test]
    fn decode_missing_file_is_io_error() {
        let result = decode(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(CodecError::Io { .. })));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = decode(&path);
        assert!(matches!(result, Err(CodecError::Decode { .. })));
    }

    #[test]
    fn encode_unknown_extension_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = encode(&uniform_image(2, 2, [0, 0, 0]), &tmp.path().join("x.bmp"), 90);
        assert!(matches!(result, Err(CodecError::UnsupportedFormat(ext)) if ext == "bmp"));
    }

    #[test]
    fn encode_into_missing_directory_is_io_error() {
        let result = encode(
            &uniform_image(2, 2, [0, 0, 0]),
            Path::new("/nonexistent/dir/out.png"),
            90,
        );
        assert!(matches!(result, Err(CodecError::Io { .. })));
    }
}
