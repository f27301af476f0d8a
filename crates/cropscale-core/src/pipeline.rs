//! The resize-then-crop render pipeline.
//!
//! A render is always recomputed from the source image: resample to the base
//! size for the current scale, then optionally crop. Cropping and not cropping
//! share one path; the crop stage is simply skipped when there are no ratios.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::decode::{Bitmap, SourceImage};
use crate::geometry::{CropPixels, CropRatios};
use crate::selection::PreviewFrame;
use crate::transform::{crop_pixels, ResampleError, Resampler};

/// Output scale as an integer percentage of the source size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScaleFactor(u32);

impl ScaleFactor {
    pub fn new(percent: u32) -> Self {
        Self(percent)
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    /// Scale as a multiplier, e.g. 0.5 for 50%.
    pub fn factor(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(100)
    }
}

/// Base image size for a source size and scale, rounded to whole pixels.
pub fn base_dimensions(width: u32, height: u32, scale: ScaleFactor) -> (u32, u32) {
    let f = scale.factor();
    (
        (width as f64 * f).round() as u32,
        (height as f64 * f).round() as u32,
    )
}

/// Result of one pipeline run.
///
/// `bitmap` is both the preview and the exportable bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub bitmap: Rc<Bitmap>,
    pub base_width: u32,
    pub base_height: u32,
    /// Crop applied to the base, in base pixels.
    pub crop: Option<CropPixels>,
}

impl RenderOutput {
    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    /// Pixel size label, e.g. `"400 × 300"`.
    pub fn dimension_label(&self) -> String {
        format!("{} × {}", self.width(), self.height())
    }

    /// Placement of this output within the base image, for pointer mapping.
    pub fn frame(&self) -> PreviewFrame {
        match self.crop {
            None => PreviewFrame::full(self.base_width, self.base_height),
            Some(crop) => PreviewFrame {
                canvas_width: self.width(),
                canvas_height: self.height(),
                origin_x: crop.x,
                origin_y: crop.y,
                base_width: self.base_width,
                base_height: self.base_height,
            },
        }
    }
}

/// Run the pipeline.
///
/// # Errors
///
/// Returns `ResampleError::InvalidDimensions` when the scale rounds the base
/// to zero pixels, or whatever the resampler reports. The caller keeps its
/// previous output in that case.
pub fn render<R: Resampler + ?Sized>(
    source: &SourceImage,
    scale: ScaleFactor,
    crop: Option<&CropRatios>,
    resampler: &R,
) -> Result<RenderOutput, ResampleError> {
    let (base_width, base_height) = base_dimensions(source.width(), source.height(), scale);
    if base_width == 0 || base_height == 0 {
        return Err(ResampleError::InvalidDimensions {
            width: base_width,
            height: base_height,
        });
    }

    let base = resampler.resample(&source.bitmap, base_width, base_height)?;
    if base.width != base_width || base.height != base_height || base.is_empty() {
        return Err(ResampleError::Failed(format!(
            "expected {}x{}, resampler returned {}x{}",
            base_width, base_height, base.width, base.height
        )));
    }

    let (bitmap, crop) = match crop {
        Some(ratios) => {
            let rect = ratios.to_pixel_rect(base_width, base_height);
            (crop_pixels(&base, rect), Some(rect))
        }
        None => (base, None),
    };

    log::debug!(
        "rendered {}% of {}x{}: base {}x{}, output {}x{}",
        scale.percent(),
        source.width(),
        source.height(),
        base_width,
        base_height,
        bitmap.width,
        bitmap.height
    );

    Ok(RenderOutput {
        bitmap: Rc::new(bitmap),
        base_width,
        base_height,
        crop,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
