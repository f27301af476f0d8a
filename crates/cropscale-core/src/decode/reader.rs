//! Image decoding with EXIF orientation handling.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader};

use super::{Bitmap, DecodeError, SourceFormat, SourceImage};

/// Decode image file bytes into a source image, applying EXIF orientation.
///
/// The format is detected from the bytes. Animated GIFs decode to their
/// first frame.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format can't be detected and
/// `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    // Missing or unreadable EXIF leaves the image as stored
    let orientation = decoder.orientation().unwrap_or(image::metadata::Orientation::NoTransforms);

    let mut img = DynamicImage::from_decoder(decoder)
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    img.apply_orientation(orientation);

    let bitmap = Bitmap::from_rgba_image(img.into_rgba8());

    log::debug!(
        "decoded {:?} image {}x{} ({:?})",
        format,
        bitmap.width,
        bitmap.height,
        orientation
    );

    Ok(SourceImage::new(bitmap, SourceFormat::from_image_format(format)))
}
