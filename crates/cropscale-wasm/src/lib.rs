//! Cropscale WASM - WebAssembly bindings for Cropscale
//!
//! This crate exposes the cropscale-core session to JavaScript/TypeScript. The
//! page keeps the DOM (file input, slider, canvas, download link) and forwards
//! events here.
//!
//! # Module Structure
//!
//! - `session` - `JsSession`, the editing session and its estimate promises
//! - `types` - WASM-compatible wrapper types for bitmaps and exported files
//! - `logging` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSession } from '@cropscale/wasm';
//!
//! await init();
//!
//! const session = new JsSession(undefined);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! await session.load_image(bytes, file.name);
//! const preview = session.preview();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(preview.pixels()), preview.width), 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod logging;
mod session;
mod types;

pub use session::JsSession;
pub use types::{JsBitmap, JsExport};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::init(log::LevelFilter::Info);
}

/// Change the console log level, e.g. `"debug"`. Returns false for unknown names.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match logging::parse_level(level) {
        Some(filter) => {
            logging::init(filter);
            true
        }
        None => false,
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
