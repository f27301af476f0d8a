//! Cropscale Core - Image resize and crop library
//!
//! This crate provides the core functionality for Cropscale: decoding a
//! source image, resizing it by a percentage, cropping it to a rectangle
//! dragged on the preview, estimating the encoded size and exporting the
//! result.
//!
//! The host (a browser page, via `cropscale-wasm`) owns the canvas and input
//! events. Everything else lives in a [`Session`].

pub mod config;
pub mod decode;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod pipeline;
pub mod selection;
pub mod session;
pub mod transform;

pub use config::{ConfigError, PipelineConfig, SharpenParams};
pub use decode::{decode_image, Bitmap, DecodeError, SourceFormat, SourceImage};
pub use encode::{EncodedPayload, EstimateJob, EstimateOutcome, EstimateResult, OutputFormat};
pub use export::ExportArtifact;
pub use geometry::{CropRatios, DisplayRect};
pub use pipeline::{RenderOutput, ScaleFactor};
pub use selection::PointerInput;
pub use session::{Session, SessionError};
