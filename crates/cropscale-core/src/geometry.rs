//! Coordinate mapping between display space, canvas pixels and crop ratios.
//!
//! Three coordinate spaces are involved:
//!
//! - **Display space**: pointer coordinates as reported by the host, relative
//!   to the page. The preview element may be stretched by CSS, so one display
//!   unit is not one pixel.
//! - **Canvas pixel space**: the backing pixel buffer of the preview.
//! - **Ratio space**: fractions (0.0 to 1.0) of the base image, independent of
//!   the scale the base was rendered at.
//!
//! Origin is the top-left corner in every space.

use serde::{Deserialize, Serialize};

/// Bounding box of the preview element in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in canvas pixel space. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Rectangle spanned by two opposite corners, in any drag direction.
    pub fn from_corners(a: CanvasPoint, b: CanvasPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// True when both sides are strictly positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Shift the rectangle by a pixel offset.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Crop rectangle as fractions of the base (scaled, uncropped) image.
///
/// Always satisfies `x + width <= 1`, `y + height <= 1`, `width > 0` and
/// `height > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRatios {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRatios {
    /// Build ratios, clamping into the unit square.
    ///
    /// Returns `None` if the clamped region has no area or any input is not
    /// finite.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return None;
        }
        let x = x.clamp(0.0, 1.0);
        let y = y.clamp(0.0, 1.0);
        let width = width.min(1.0 - x);
        let height = height.min(1.0 - y);
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Absolute crop rectangle for a base image of the given size.
    ///
    /// Each field is rounded to the nearest pixel, then the rectangle is
    /// clamped into the base. The result is at least 1x1 for a non-empty base.
    pub fn to_pixel_rect(&self, base_width: u32, base_height: u32) -> CropPixels {
        let bw = base_width as f64;
        let bh = base_height as f64;

        let x = ((self.x * bw).round() as u32).min(base_width.saturating_sub(1));
        let y = ((self.y * bh).round() as u32).min(base_height.saturating_sub(1));
        let width = ((self.width * bw).round() as u32)
            .max(1)
            .min(base_width.saturating_sub(x));
        let height = ((self.height * bh).round() as u32)
            .max(1)
            .min(base_height.saturating_sub(y));

        CropPixels {
            x,
            y,
            width,
            height,
        }
    }
}

/// Integer crop rectangle in base image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropPixels {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Map a pointer position in display space to canvas pixels.
///
/// Compensates for CSS scaling of the canvas element relative to its backing
/// buffer, then clamps to `[0, canvas_width] x [0, canvas_height]`.
///
/// Returns `None` if the canvas or the displayed element has no size.
pub fn to_canvas_pixels(
    pointer_x: f64,
    pointer_y: f64,
    display: &DisplayRect,
    canvas_width: u32,
    canvas_height: u32,
) -> Option<CanvasPoint> {
    if canvas_width == 0 || canvas_height == 0 {
        return None;
    }
    if !(display.width > 0.0 && display.height > 0.0) || !display.width.is_finite() {
        return None;
    }
    if !pointer_x.is_finite() || !pointer_y.is_finite() || !display.height.is_finite() {
        return None;
    }

    let cw = canvas_width as f64;
    let ch = canvas_height as f64;

    let x = (pointer_x - display.left) * (cw / display.width);
    let y = (pointer_y - display.top) * (ch / display.height);

    Some(CanvasPoint::new(x.clamp(0.0, cw), y.clamp(0.0, ch)))
}

/// Convert a canvas pixel rectangle to ratios of that canvas.
///
/// Returns `None` for a zero-sized canvas or a rectangle without area.
pub fn to_ratios(rect: &PixelRect, canvas_width: u32, canvas_height: u32) -> Option<CropRatios> {
    if canvas_width == 0 || canvas_height == 0 || !rect.has_area() {
        return None;
    }
    let cw = canvas_width as f64;
    let ch = canvas_height as f64;

    CropRatios::new(
        rect.x / cw,
        rect.y / ch,
        rect.width / cw,
        rect.height / ch,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================
