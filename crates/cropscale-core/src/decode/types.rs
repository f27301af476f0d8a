//! Core types for decoded images.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::OutputFormat;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Pixel buffer length doesn't match the stated dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Format the source file was loaded from.
///
/// Determines the output format used for size estimation and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
    /// Any other MIME type reported by the browser.
    Other(String),
}

impl SourceFormat {
    /// Parse a MIME type such as `image/jpeg`.
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => SourceFormat::Jpeg,
            "image/png" => SourceFormat::Png,
            "image/webp" => SourceFormat::Webp,
            "image/gif" => SourceFormat::Gif,
            "image/bmp" | "image/x-ms-bmp" => SourceFormat::Bmp,
            other => SourceFormat::Other(other.to_string()),
        }
    }

    /// Map a format detected by the `image` crate.
    pub fn from_image_format(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => SourceFormat::Jpeg,
            image::ImageFormat::Png => SourceFormat::Png,
            image::ImageFormat::WebP => SourceFormat::Webp,
            image::ImageFormat::Gif => SourceFormat::Gif,
            image::ImageFormat::Bmp => SourceFormat::Bmp,
            other => SourceFormat::Other(other.to_mime_type().to_string()),
        }
    }

    /// The format the pipeline encodes to.
    ///
    /// Animated or unsupported formats fall back to PNG.
    pub fn output_format(&self) -> OutputFormat {
        match self {
            SourceFormat::Jpeg => OutputFormat::Jpeg,
            SourceFormat::Webp => OutputFormat::Webp,
            SourceFormat::Bmp => OutputFormat::Bmp,
            SourceFormat::Png | SourceFormat::Gif | SourceFormat::Other(_) => OutputFormat::Png,
        }
    }

    /// True when the output format differs from the source format.
    pub fn is_substituted(&self) -> bool {
        matches!(self, SourceFormat::Gif | SourceFormat::Other(_))
    }
}

/// An RGBA bitmap, 4 bytes per pixel in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data. Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 4,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Bitmap from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Check if this is an empty/invalid bitmap.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// A loaded source image: its bitmap at intrinsic size plus the format it came from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub bitmap: Bitmap,
    pub format: SourceFormat,
}

impl SourceImage {
    pub fn new(bitmap: Bitmap, format: SourceFormat) -> Self {
        Self { bitmap, format }
    }

    /// Wrap an RGBA buffer the host already decoded (e.g. canvas `ImageData`).
    pub fn from_rgba(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        format: SourceFormat,
    ) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(DecodeError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self::new(Bitmap::new(width, height, pixels), format))
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.bitmap.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_from_mime() {
        assert_eq!(SourceFormat::from_mime("image/jpeg"), SourceFormat::Jpeg);
        assert_eq!(SourceFormat::from_mime("IMAGE/PNG"), SourceFormat::Png);
        assert_eq!(SourceFormat::from_mime("image/gif"), SourceFormat::Gif);
        assert_eq!(
            SourceFormat::from_mime("image/avif"),
            SourceFormat::Other("image/avif".to_string())
        );
    }

    #[test]
    fn test_gif_maps_to_png() {
        assert_eq!(SourceFormat::Gif.output_format(), OutputFormat::Png);
        assert!(SourceFormat::Gif.is_substituted());
    }

    #[test]
    fn test_formats_keep_themselves() {
        assert_eq!(SourceFormat::Jpeg.output_format(), OutputFormat::Jpeg);
        assert_eq!(SourceFormat::Png.output_format(), OutputFormat::Png);
        assert_eq!(SourceFormat::Webp.output_format(), OutputFormat::Webp);
        assert_eq!(SourceFormat::Bmp.output_format(), OutputFormat::Bmp);
        assert!(!SourceFormat::Jpeg.is_substituted());
        assert!(!SourceFormat::Png.is_substituted());
    }

    #[test]
    fn test_unknown_format_falls_back_to_png() {
        let format = SourceFormat::Other("image/avif".to_string());
        assert_eq!(format.output_format(), OutputFormat::Png);
        assert!(format.is_substituted());
    }

    #[test]
    fn test_bitmap_creation() {
        let bitmap = Bitmap::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(bitmap.width, 100);
        assert_eq!(bitmap.height, 50);
        assert_eq!(bitmap.pixels.len(), 20000);
        assert!(!bitmap.is_empty());
    }

    #[test]
    fn test_bitmap_empty() {
        let bitmap = Bitmap::new(0, 0, vec![]);
        assert!(bitmap.is_empty());
    }

    #[test]
    fn test_source_from_rgba_validates_length() {
        let result = SourceImage::from_rgba(10, 10, vec![0u8; 10], SourceFormat::Png);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidPixelData {
                expected: 400,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_source_from_rgba_rejects_zero_dimensions() {
        let result = SourceImage::from_rgba(0, 10, vec![], SourceFormat::Png);
        assert!(matches!(result, Err(DecodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_source_from_rgba_ok() {
        let source = SourceImage::from_rgba(4, 2, vec![7u8; 32], SourceFormat::Jpeg).unwrap();
        assert_eq!(source.width(), 4);
        assert_eq!(source.height(), 2);
        assert_eq!(source.format, SourceFormat::Jpeg);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::InvalidDimensions {
            width: 0,
            height: 5,
        };
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width (0) and height (5) must be non-zero"
        );

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
