//! Encoding and size estimation for Cropscale.
//!
//! This module provides functionality for:
//! - Encoding RGBA bitmaps to JPEG, PNG, WebP or BMP
//! - Running encodes as asynchronous estimate jobs
//! - Keeping only the newest completed estimate as the exportable payload
//!
//! # Architecture
//!
//! Encoding is the only suspension point of the pipeline. The session issues
//! an [`EstimateJob`] per render; the host awaits it and feeds the result
//! back, where the [`PayloadSlot`] drops anything stale.
//!
//! # Examples
//!
//! ```ignore
//! use cropscale_core::encode::{encode_bitmap, OutputFormat};
//!
//! let payload = encode_bitmap(&bitmap, OutputFormat::Png, 92).unwrap();
//! println!("Encoded {} bytes", payload.len());
//! ```

mod estimate;
mod format;

pub use estimate::{
    format_size_label, EstimateJob, EstimateOutcome, EstimateResult, Generation, PayloadSlot,
};
pub use format::{encode_bitmap, EncodeError, EncodedPayload, OutputFormat};
