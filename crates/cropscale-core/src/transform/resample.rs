//! Resampling the source image to the base size.
//!
//! The resampler is a seam: the pipeline only decides *when* to resample and
//! *to what size*. [`LanczosResampler`] is the default implementation, using
//! the `image` crate's filters followed by an unsharp mask.

use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

use crate::config::SharpenParams;
use crate::decode::Bitmap;

/// Errors from resampling.
#[derive(Debug, Error, PartialEq)]
pub enum ResampleError {
    /// Target width or height is zero.
    #[error("Invalid target dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The source bitmap's buffer doesn't match its dimensions.
    #[error("Source bitmap is corrupted: {0}")]
    CorruptedSource(String),

    /// The resampler itself failed.
    #[error("Resampling failed: {0}")]
    Failed(String),
}

/// Resizes a bitmap to exact dimensions.
pub trait Resampler {
    fn resample(&self, image: &Bitmap, width: u32, height: u32) -> Result<Bitmap, ResampleError>;
}

/// High-quality resampler: Lanczos3 resize plus unsharp mask.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LanczosResampler {
    pub sharpen: SharpenParams,
}

impl LanczosResampler {
    pub fn new(sharpen: SharpenParams) -> Self {
        Self { sharpen }
    }
}

impl Resampler for LanczosResampler {
    fn resample(&self, image: &Bitmap, width: u32, height: u32) -> Result<Bitmap, ResampleError> {
        if width == 0 || height == 0 {
            return Err(ResampleError::InvalidDimensions { width, height });
        }

        if image.width == width && image.height == height && self.sharpen.is_disabled() {
            return Ok(image.clone());
        }

        let rgba = image.to_rgba_image().ok_or_else(|| {
            ResampleError::CorruptedSource(format!(
                "{} bytes for {}x{}",
                image.pixels.len(),
                image.width,
                image.height
            ))
        })?;

        // Same size: no resize, but still sharpened like every other scale
        let sharpened = if rgba.dimensions() == (width, height) {
            unsharp_mask(&rgba, &self.sharpen)
        } else {
            let resized = image::imageops::resize(&rgba, width, height, FilterType::Lanczos3);
            unsharp_mask(&resized, &self.sharpen)
        };

        Ok(Bitmap::from_rgba_image(sharpened))
    }
}

/// Sharpen colour channels by adding back the difference from a blurred copy.
///
/// Alpha is left untouched.
pub fn unsharp_mask(image: &RgbaImage, params: &SharpenParams) -> RgbaImage {
    if params.is_disabled() {
        return image.clone();
    }

    let blurred = image::imageops::blur(image, params.radius);
    let amount = params.amount / 100.0;
    let threshold = i32::from(params.threshold);

    let mut output = image.clone();
    for (dst, blur) in output.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let orig = dst[c];
            let diff = i32::from(orig) - i32::from(blur[c]);
            if diff.abs() > threshold {
                let value = f32::from(orig) + diff as f32 * amount;
                dst[c] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    output
}
