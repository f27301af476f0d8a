//! Image transformation operations: resampling, cropping and overlays.
//!
//! # Transform Order
//!
//! Every render applies transforms in this order:
//! 1. Resample the source to the base size for the current scale
//! 2. Crop (optional), resolved from ratios against the base size
//!
//! Overlays are drawn on a copy of the last render and never feed back into
//! the pipeline.
//!
//! # Coordinate System
//!
//! - Crop coordinates are normalized (0.0 to 1.0) relative to the base image
//! - Origin is top-left corner

mod crop;
mod overlay;
mod resample;

pub use crop::crop_pixels;
pub use overlay::{draw_selection_overlay, OverlayStyle};
pub use resample::{unsharp_mask, LanczosResampler, ResampleError, Resampler};
