//! Pipeline configuration.
//!
//! Every field has a default, so hosts can pass a partial object (or nothing)
//! and override only what they need.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from validating a [`PipelineConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The scale range is empty or starts at zero.
    #[error("Invalid scale range: {min}..={max} (minimum must be at least 1 and not above maximum)")]
    InvalidScaleRange { min: u32, max: u32 },

    /// Quality outside 1-100.
    #[error("Invalid quality {0}: must be between 1 and 100")]
    InvalidQuality(u8),

    /// Sharpening parameters are negative or not finite.
    #[error("Invalid sharpening parameters: {0}")]
    InvalidSharpen(String),
}

/// Unsharp mask applied after resampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenParams {
    /// Strength in percent of the high-pass difference added back (0 disables).
    pub amount: f32,
    /// Gaussian blur sigma in pixels.
    pub radius: f32,
    /// Differences at or below this value (0-255) are left alone.
    pub threshold: u8,
}

impl Default for SharpenParams {
    fn default() -> Self {
        Self {
            amount: 80.0,
            radius: 0.6,
            threshold: 2,
        }
    }
}

impl SharpenParams {
    /// Check if sharpening has no effect.
    pub fn is_disabled(&self) -> bool {
        self.amount <= 0.0 || self.radius <= 0.0
    }
}

/// Settings for the resize/crop/estimate pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Smallest accepted scale percentage.
    pub min_scale: u32,
    /// Largest accepted scale percentage.
    pub max_scale: u32,
    /// Scale used when a session starts.
    pub initial_scale: u32,
    /// Encoder quality for lossy formats (1-100).
    pub quality: u8,
    /// Sharpening applied by the default resampler.
    pub sharpen: SharpenParams,
    /// Suffix inserted before the extension of exported files.
    pub file_suffix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_scale: 1,
            max_scale: 100,
            initial_scale: 100,
            quality: 92,
            sharpen: SharpenParams::default(),
            file_suffix: "_resized".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate ranges. The initial scale is clamped later, so it is not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_scale == 0 || self.min_scale > self.max_scale {
            return Err(ConfigError::InvalidScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::InvalidQuality(self.quality));
        }
        let SharpenParams { amount, radius, .. } = self.sharpen;
        if !amount.is_finite() || !radius.is_finite() || amount < 0.0 || radius < 0.0 {
            return Err(ConfigError::InvalidSharpen(format!(
                "amount {amount}, radius {radius}"
            )));
        }
        Ok(())
    }

    /// Clamp a requested percentage into the configured range.
    pub fn clamp_scale(&self, percent: u32) -> u32 {
        percent.clamp(self.min_scale, self.max_scale.max(self.min_scale))
    }
}
