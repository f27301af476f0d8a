//! WASM-compatible wrapper types for bitmaps and exported files.
//!
//! These wrap the core Cropscale types and handle the conversion between Rust
//! and JavaScript data representations.

use cropscale_core::{Bitmap, ExportArtifact};
use wasm_bindgen::prelude::*;

/// An RGBA bitmap for JavaScript, ready for `new ImageData(...)`.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a bitmap from dimensions and RGBA pixel data (4 bytes per pixel).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsBitmap {
        JsBitmap {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer handles cleanup automatically.
    pub fn free(self) {}
}

impl JsBitmap {
    pub(crate) fn from_bitmap(bitmap: &Bitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            pixels: bitmap.pixels.clone(),
        }
    }
}

/// An encoded file for the page's download link.
///
/// ```typescript
/// const file = session.export();
/// if (file) {
///   link.href = URL.createObjectURL(new Blob([file.bytes()], { type: file.mime_type }));
///   link.download = file.file_name;
/// }
/// ```
#[wasm_bindgen]
pub struct JsExport {
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsExport {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Encoded file bytes as Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<ExportArtifact> for JsExport {
    fn from(artifact: ExportArtifact) -> Self {
        Self {
            file_name: artifact.file_name,
            mime_type: artifact.mime_type,
            bytes: artifact.bytes,
        }
    }
}
