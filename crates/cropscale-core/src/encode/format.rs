//! Encoding bitmaps to the output format.
//!
//! Uses the `image` crate's encoders. Quality only applies to JPEG; PNG, BMP
//! and (lossless) WebP ignore it.

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::Bitmap;

/// Errors that can occur during encoding.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

/// Format of the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    Bmp,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Bmp => "image/bmp",
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Bmp => "bmp",
        }
    }

    fn name(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WebP",
            OutputFormat::Bmp => "BMP",
        }
    }
}

/// Encoded file bytes plus the format they are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl EncodedPayload {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode an RGBA bitmap.
///
/// # Arguments
///
/// * `bitmap` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `format` - Output format
/// * `quality` - JPEG quality (1-100); clamped, ignored for lossless formats
///
/// # Example
///
/// ```
/// use cropscale_core::decode::Bitmap;
/// use cropscale_core::encode::{encode_bitmap, OutputFormat};
///
/// let bitmap = Bitmap::new(100, 100, vec![128u8; 100 * 100 * 4]);
/// let payload = encode_bitmap(&bitmap, OutputFormat::Jpeg, 92).unwrap();
///
/// // Verify JPEG magic bytes
/// assert_eq!(&payload.bytes[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_bitmap(
    bitmap: &Bitmap,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedPayload, EncodeError> {
    let (width, height) = (bitmap.width, bitmap.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 4;
    if bitmap.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: bitmap.pixels.len(),
        });
    }

    let mut buffer = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            let rgb = flatten_alpha(&bitmap.pixels);
            JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
            &bitmap.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Webp => WebPEncoder::new_lossless(&mut buffer).write_image(
            &bitmap.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Bmp => BmpEncoder::new(&mut buffer).write_image(
            &bitmap.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };

    result.map_err(|e| EncodeError::EncodingFailed {
        format: format.name(),
        message: e.to_string(),
    })?;

    Ok(EncodedPayload {
        bytes: buffer,
        format,
    })
}

/// Composite RGBA over black and drop the alpha channel.
fn flatten_alpha(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = u16::from(px[3]);
        for &c in &px[..3] {
            rgb.push(((u16::from(c) * a + 127) / 255) as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> Bitmap {
        Bitmap::new(width, height, vec![128u8; (width * height * 4) as usize])
    }

    fn gradient(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[
                    (x * 255 / width) as u8,
                    (y * 255 / height) as u8,
                    128,
                    255,
                ]);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let payload = encode_bitmap(&gray(100, 100), OutputFormat::Jpeg, 92).unwrap();

        // Check JPEG SOI and EOI markers
        assert_eq!(&payload.bytes[0..2], &[0xFF, 0xD8]);
        let len = payload.len();
        assert_eq!(&payload.bytes[len - 2..], &[0xFF, 0xD9]);
        assert_eq!(payload.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_encode_png_signature() {
        let payload = encode_bitmap(&gradient(20, 10), OutputFormat::Png, 92).unwrap();
        assert_eq!(&payload.bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(payload.mime_type(), "image/png");
    }

    #[test]
    fn test_encode_webp_signature() {
        let payload = encode_bitmap(&gradient(20, 10), OutputFormat::Webp, 92).unwrap();
        assert_eq!(&payload.bytes[0..4], b"RIFF");
        assert_eq!(&payload.bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_encode_bmp_signature() {
        let payload = encode_bitmap(&gradient(20, 10), OutputFormat::Bmp, 92).unwrap();
        assert_eq!(&payload.bytes[0..2], b"BM");
    }

    #[test]
    fn test_png_round_trips_pixels() {
        let bitmap = gradient(16, 9);
        let payload = encode_bitmap(&bitmap, OutputFormat::Png, 92).unwrap();

        let decoded = image::load_from_memory(&payload.bytes).unwrap().into_rgba8();
        assert_eq!(decoded.into_raw(), bitmap.pixels);
    }

    #[test]
    fn test_quality_ignored_for_png() {
        let bitmap = gradient(30, 30);
        let low = encode_bitmap(&bitmap, OutputFormat::Png, 10).unwrap();
        let high = encode_bitmap(&bitmap, OutputFormat::Png, 100).unwrap();
        assert_eq!(low, high);
    }

    #[test]
    fn test_jpeg_quality_clamping() {
        assert!(encode_bitmap(&gray(10, 10), OutputFormat::Jpeg, 0).is_ok());
        assert!(encode_bitmap(&gray(10, 10), OutputFormat::Jpeg, 255).is_ok());
    }

    #[test]
    fn test_invalid_pixel_data() {
        let bitmap = Bitmap {
            width: 10,
            height: 10,
            pixels: vec![0u8; 99],
        };
        let result = encode_bitmap(&bitmap, OutputFormat::Png, 92);
        assert_eq!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 400,
                actual: 99
            })
        );
    }

    #[test]
    fn test_zero_dimensions() {
        let bitmap = Bitmap {
            width: 0,
            height: 10,
            pixels: vec![],
        };
        let result = encode_bitmap(&bitmap, OutputFormat::Jpeg, 92);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_flatten_alpha_over_black() {
        let rgb = flatten_alpha(&[200, 100, 50, 255, 200, 100, 50, 0, 255, 255, 255, 128]);
        assert_eq!(rgb, vec![200, 100, 50, 0, 0, 0, 128, 128, 128]);
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Webp.mime_type(), "image/webp");
        assert_eq!(OutputFormat::Bmp.extension(), "bmp");
    }

    #[test]
    fn test_payload_len() {
        let payload = EncodedPayload {
            bytes: vec![0u8; 2048],
            format: OutputFormat::Png,
        };
        assert_eq!(payload.len(), 2048);
        assert!(!payload.is_empty());
        assert_eq!(payload.mime_type(), "image/png");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
