//! Image decoding for Cropscale.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, WebP, GIF (first frame) and BMP files to RGBA
//! - Applying EXIF orientation so the bitmap matches what the browser shows
//! - Wrapping pixel buffers the browser has already decoded
//!
//! # Examples
//!
//! ```ignore
//! use cropscale_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let source = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", source.width(), source.height());
//! ```

mod reader;
mod types;

pub use reader::decode_image;
pub use types::{Bitmap, DecodeError, SourceFormat, SourceImage};
