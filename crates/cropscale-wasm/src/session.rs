//! Session WASM bindings.
//!
//! `JsSession` wraps a core [`Session`] for the page script. Operations that
//! re-render return a `Promise` for the size estimate, which resolves to the
//! new size label, or `null` when a newer render superseded it. Before an
//! image is loaded these operations return `undefined`.
//!
//! # Example
//!
//! ```typescript
//! import { JsSession } from '@cropscale/wasm';
//!
//! const session = new JsSession({ quality: 90 });
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! sizeLabel.textContent = await session.load_image(bytes, file.name);
//!
//! slider.oninput = async () => {
//!   const label = await session.set_scale(Number(slider.value));
//!   if (label) sizeLabel.textContent = label;
//! };
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use cropscale_core::encode::EstimateJob;
use cropscale_core::{
    decode_image, DisplayRect, EstimateOutcome, EstimateResult, PipelineConfig, PointerInput,
    Session, SessionError, SourceFormat, SourceImage,
};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::types::{JsBitmap, JsExport};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn pointer(x: f64, y: f64, left: f64, top: f64, width: f64, height: f64) -> PointerInput {
    PointerInput::new(x, y, DisplayRect::new(left, top, width, height))
}

/// Interactions before an image is loaded are silent no-ops for the page.
fn unless_unloaded<T>(result: Result<T, SessionError>) -> Result<Option<T>, SessionError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(SessionError::NoImageLoaded) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Store a finished estimate and report what the page should show.
///
/// `Ok(Some(label))` for an applied estimate, `Ok(None)` for a stale one.
fn settle(session: &RefCell<Session>, result: EstimateResult) -> Result<Option<String>, String> {
    let mut session = session.borrow_mut();
    match session.complete_estimate(result) {
        EstimateOutcome::Applied => Ok(session.size_label()),
        EstimateOutcome::Stale => Ok(None),
        EstimateOutcome::Failed(e) => Err(e.to_string()),
    }
}

/// A resize/crop session bound to one page.
#[wasm_bindgen]
pub struct JsSession {
    inner: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl JsSession {
    /// Create a session. `config` may be `undefined` or a partial
    /// `PipelineConfig` object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?
        };
        Self::with_config(config).map_err(to_js_error)
    }

    /// Decode an encoded file and make it the current image.
    pub fn load_image(&self, bytes: &[u8], file_name: String) -> Result<Promise, JsValue> {
        let source = decode_image(bytes).map_err(to_js_error)?;
        self.load(source, file_name)
    }

    /// Use RGBA pixels the browser already decoded (canvas `ImageData`).
    pub fn load_pixels(
        &self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        file_name: String,
        mime_type: &str,
    ) -> Result<Promise, JsValue> {
        let source = SourceImage::from_rgba(width, height, pixels, SourceFormat::from_mime(mime_type))
            .map_err(to_js_error)?;
        self.load(source, file_name)
    }

    /// Returns `undefined` when no image is loaded yet.
    pub fn set_scale(&self, percent: u32) -> Result<Option<Promise>, JsValue> {
        let job = unless_unloaded(self.inner.borrow_mut().set_scale(percent)).map_err(to_js_error)?;
        Ok(job.map(|job| self.estimate(job)))
    }

    /// Start a drag. Coordinates are client coordinates; `left`..`height`
    /// are the preview element's bounding rectangle.
    pub fn pointer_down(
        &self,
        x: f64,
        y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        let result = self
            .inner
            .borrow_mut()
            .pointer_down(&pointer(x, y, left, top, width, height));
        unless_unloaded(result).map(|_| ()).map_err(to_js_error)
    }

    /// Preview with the selection rectangle drawn, or `undefined` when not dragging.
    pub fn pointer_move(&self, x: f64, y: f64, left: f64, top: f64, width: f64, height: f64) -> Option<JsBitmap> {
        self.inner
            .borrow_mut()
            .pointer_move(&pointer(x, y, left, top, width, height))
            .map(|overlay| JsBitmap::from_bitmap(&overlay))
    }

    /// Finish a drag. Returns `undefined` when no drag was in progress or no
    /// image is loaded.
    pub fn pointer_up(
        &self,
        x: f64,
        y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<Option<Promise>, JsValue> {
        let result = self
            .inner
            .borrow_mut()
            .pointer_up(&pointer(x, y, left, top, width, height));
        let job = unless_unloaded(result).map_err(to_js_error)?.flatten();
        Ok(job.map(|job| self.estimate(job)))
    }

    pub fn reset_crop(&self) -> Result<Option<Promise>, JsValue> {
        let job = unless_unloaded(self.inner.borrow_mut().reset_crop()).map_err(to_js_error)?;
        Ok(job.map(|job| self.estimate(job)))
    }

    /// The last successful render.
    pub fn preview(&self) -> Option<JsBitmap> {
        self.inner
            .borrow()
            .preview()
            .map(|output| JsBitmap::from_bitmap(&output.bitmap))
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> u32 {
        self.inner.borrow().scale().percent()
    }

    #[wasm_bindgen(getter)]
    pub fn dimension_label(&self) -> Option<String> {
        self.inner.borrow().dimension_label()
    }

    #[wasm_bindgen(getter)]
    pub fn size_label(&self) -> Option<String> {
        self.inner.borrow().size_label()
    }

    #[wasm_bindgen(getter)]
    pub fn reset_visible(&self) -> bool {
        self.inner.borrow().reset_visible()
    }

    /// True while a drag is in progress.
    #[wasm_bindgen(getter)]
    pub fn is_selecting(&self) -> bool {
        self.inner.borrow().is_selecting()
    }

    /// The current payload as a named file, or `undefined` before the first
    /// estimate lands.
    pub fn export(&self) -> Option<JsExport> {
        match self.inner.borrow().export() {
            Ok(artifact) => Some(JsExport::from(artifact)),
            Err(e) => {
                log::debug!("export ignored: {}", e);
                None
            }
        }
    }
}

impl JsSession {
    fn with_config(config: PipelineConfig) -> Result<Self, cropscale_core::SessionError> {
        Ok(Self {
            inner: Rc::new(RefCell::new(Session::new(config)?)),
        })
    }

    fn load(&self, source: SourceImage, file_name: String) -> Result<Promise, JsValue> {
        let job = self
            .inner
            .borrow_mut()
            .load(source, file_name)
            .map_err(to_js_error)?;
        Ok(self.estimate(job))
    }

    fn estimate(&self, job: EstimateJob) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let result = job.run().await;
            match settle(&inner, result) {
                Ok(Some(label)) => Ok(JsValue::from_str(&label)),
                Ok(None) => Ok(JsValue::NULL),
                Err(message) => Err(JsValue::from_str(&message)),
            }
        })
    }
}
