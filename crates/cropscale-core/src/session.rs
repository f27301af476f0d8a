//! Editing session: the explicit state object for one loaded image.
//!
//! The session owns the source image, the scale, the committed crop ratios,
//! the drag in progress, the last good render and the payload slot. Every
//! change that affects scale or crop re-runs the pipeline and returns an
//! [`EstimateJob`]; the host awaits it and passes the result back through
//! [`Session::complete_estimate`].
//!
//! ```ignore
//! let mut session = Session::new(PipelineConfig::default())?;
//! let job = session.load(source, "photo.jpg")?;
//! session.complete_estimate(job.run().await);
//!
//! let job = session.set_scale(50)?;
//! session.complete_estimate(job.run().await);
//! println!("{}", session.size_label().unwrap_or_default());
//! ```

use thiserror::Error;

use crate::config::{ConfigError, PipelineConfig};
use crate::decode::{Bitmap, SourceImage};
use crate::encode::{format_size_label, EncodedPayload, EstimateJob, EstimateOutcome, EstimateResult, PayloadSlot};
use crate::export::ExportArtifact;
use crate::geometry::CropRatios;
use crate::pipeline::{self, RenderOutput, ScaleFactor};
use crate::selection::{PointerInput, Selection, SelectionOutcome};
use crate::transform::{draw_selection_overlay, LanczosResampler, OverlayStyle, ResampleError, Resampler};

/// Errors surfaced by session operations. None of them end the session.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// An interaction needs an image (and a rendered preview) first.
    #[error("No image loaded")]
    NoImageLoaded,

    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Resampling failed; the previous preview is still shown.
    #[error("Render failed: {0}")]
    Resample(#[from] ResampleError),

    /// Export requested before any payload was produced.
    #[error("Nothing to export yet")]
    MissingExportState,
}

#[derive(Debug)]
struct LoadedImage {
    source: SourceImage,
    file_name: String,
}

/// State for one image being resized and cropped.
#[derive(Debug)]
pub struct Session<R: Resampler = LanczosResampler> {
    config: PipelineConfig,
    resampler: R,
    image: Option<LoadedImage>,
    scale: ScaleFactor,
    crop: Option<CropRatios>,
    selection: Selection,
    reset_visible: bool,
    preview: Option<RenderOutput>,
    estimates: PayloadSlot,
    overlay_style: OverlayStyle,
}

impl Session<LanczosResampler> {
    /// Create a session using the default resampler with the configured sharpening.
    pub fn new(config: PipelineConfig) -> Result<Self, SessionError> {
        let resampler = LanczosResampler::new(config.sharpen);
        Self::with_resampler(config, resampler)
    }
}

impl<R: Resampler> Session<R> {
    pub fn with_resampler(config: PipelineConfig, resampler: R) -> Result<Self, SessionError> {
        config.validate()?;
        let scale = ScaleFactor::new(config.clamp_scale(config.initial_scale));
        Ok(Self {
            config,
            resampler,
            image: None,
            scale,
            crop: None,
            selection: Selection::new(),
            reset_visible: false,
            preview: None,
            estimates: PayloadSlot::new(),
            overlay_style: OverlayStyle::default(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether a drag is in progress.
    pub fn is_selecting(&self) -> bool {
        self.selection.is_selecting()
    }

    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    pub fn crop(&self) -> Option<&CropRatios> {
        self.crop.as_ref()
    }

    /// Whether the "reset crop" control should be shown.
    pub fn reset_visible(&self) -> bool {
        self.reset_visible
    }

    /// Last successful render.
    pub fn preview(&self) -> Option<&RenderOutput> {
        self.preview.as_ref()
    }

    /// `"{width} × {height}"` of the last successful render.
    pub fn dimension_label(&self) -> Option<String> {
        self.preview.as_ref().map(RenderOutput::dimension_label)
    }

    /// `"Estimated size: {KB} KB"` of the current payload.
    pub fn size_label(&self) -> Option<String> {
        self.estimates.payload().map(|p| format_size_label(p.len()))
    }

    pub fn payload(&self) -> Option<&EncodedPayload> {
        self.estimates.payload()
    }

    /// Replace the source image.
    ///
    /// Drops the drag in progress and the payload, and invalidates pending
    /// estimates. Crop ratios are kept and applied to the new image.
    pub fn load(&mut self, source: SourceImage, file_name: impl Into<String>) -> Result<EstimateJob, SessionError> {
        let file_name = file_name.into();
        log::info!(
            "loading {} ({}x{}, {:?})",
            file_name,
            source.width(),
            source.height(),
            source.format
        );

        self.image = Some(LoadedImage { source, file_name });
        self.selection.cancel();
        self.preview = None;
        self.estimates.clear();

        self.render()
    }

    /// Change the scale percentage (clamped to the configured range) and re-render.
    ///
    /// The crop ratios are kept and re-applied to the new base size.
    pub fn set_scale(&mut self, percent: u32) -> Result<EstimateJob, SessionError> {
        self.scale = ScaleFactor::new(self.config.clamp_scale(percent));
        self.render()
    }

    /// Start a drag on the preview.
    pub fn pointer_down(&mut self, input: &PointerInput) -> Result<(), SessionError> {
        let frame = self.preview.as_ref().ok_or(SessionError::NoImageLoaded)?.frame();
        if !self.selection.pointer_down(input, &frame) {
            log::debug!("pointer down outside a mappable preview, ignored");
        }
        Ok(())
    }

    /// Update the drag and return the preview with the selection overlay.
    ///
    /// Returns `None` when no drag is in progress. Crop ratios and the
    /// payload are not touched.
    pub fn pointer_move(&mut self, input: &PointerInput) -> Option<Bitmap> {
        let preview = self.preview.as_ref()?;
        let rect = self.selection.pointer_move(input, &preview.frame())?;
        Some(draw_selection_overlay(&preview.bitmap, &rect, &self.overlay_style))
    }

    /// Finish the drag.
    ///
    /// A rectangle with area becomes the new crop and shows the reset
    /// control. A zero-area release clears the crop and hides it. Both
    /// re-render; `Ok(None)` means no drag was in progress.
    pub fn pointer_up(&mut self, input: &PointerInput) -> Result<Option<EstimateJob>, SessionError> {
        let frame = self.preview.as_ref().ok_or(SessionError::NoImageLoaded)?.frame();

        match self.selection.pointer_up(input, &frame) {
            SelectionOutcome::Ignored => Ok(None),
            SelectionOutcome::Committed(ratios) => {
                log::debug!("crop committed: {:?}", ratios);
                self.crop = Some(ratios);
                self.reset_visible = true;
                self.render().map(Some)
            }
            SelectionOutcome::Cleared => {
                log::debug!("zero-area selection, crop cleared");
                self.crop = None;
                self.reset_visible = false;
                self.render().map(Some)
            }
        }
    }

    /// Drop the crop and re-render the full base image.
    pub fn reset_crop(&mut self) -> Result<EstimateJob, SessionError> {
        self.crop = None;
        self.reset_visible = false;
        self.selection.cancel();
        self.render()
    }

    /// Run the pipeline for the current state.
    ///
    /// On success the preview is replaced and a new estimate generation is
    /// issued. On failure the previous preview and payload stay as they were.
    pub fn render(&mut self) -> Result<EstimateJob, SessionError> {
        let loaded = self.image.as_ref().ok_or(SessionError::NoImageLoaded)?;

        let output = pipeline::render(&loaded.source, self.scale, self.crop.as_ref(), &self.resampler)
            .map_err(|e| {
                log::warn!("render at {}% failed: {}", self.scale.percent(), e);
                SessionError::from(e)
            })?;

        let job = self.estimates.issue(
            output.bitmap.clone(),
            loaded.source.format.output_format(),
            self.config.quality,
        );
        self.preview = Some(output);
        Ok(job)
    }

    /// Feed back a finished estimate. Stale results are discarded.
    pub fn complete_estimate(&mut self, result: EstimateResult) -> EstimateOutcome {
        self.estimates.complete(result)
    }

    /// The current payload under its export file name. Never re-encodes.
    pub fn export(&self) -> Result<ExportArtifact, SessionError> {
        let loaded = self.image.as_ref().ok_or(SessionError::MissingExportState)?;
        let payload = self.estimates.payload().ok_or(SessionError::MissingExportState)?;

        Ok(ExportArtifact::from_payload(
            payload,
            &loaded.file_name,
            loaded.source.format.is_substituted(),
            &self.config.file_suffix,
        ))
    }
}
