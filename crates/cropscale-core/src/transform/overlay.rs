//! Dashed selection rectangle drawn over the last rendered preview.
//!
//! Used for live feedback while dragging. Drawing works on a copy; the
//! rendered bitmap and the exportable payload are never touched.

use serde::{Deserialize, Serialize};

use crate::decode::Bitmap;
use crate::geometry::PixelRect;

/// Stroke style for the selection overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// RGBA stroke colour.
    pub color: [u8; 4],
    /// Stroke width in pixels, centred on the rectangle edge.
    pub line_width: u32,
    /// Length of each dash and each gap in pixels.
    pub dash: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0, 255],
            line_width: 2,
            dash: 6,
        }
    }
}

/// Return a copy of `base` with a dashed rectangle stroked along `rect`.
pub fn draw_selection_overlay(base: &Bitmap, rect: &PixelRect, style: &OverlayStyle) -> Bitmap {
    let mut out = base.clone();
    if base.is_empty() || style.line_width == 0 {
        return out;
    }

    let x0 = rect.x.round() as i64;
    let y0 = rect.y.round() as i64;
    let x1 = (rect.x + rect.width).round() as i64;
    let y1 = (rect.y + rect.height).round() as i64;
    let dash = i64::from(style.dash.max(1));

    let lw = i64::from(style.line_width);
    let offsets = -(lw / 2)..(lw - lw / 2);

    let mut walked = 0i64;
    let mut stroke = |out: &mut Bitmap, x: i64, y: i64, horizontal: bool| {
        if (walked / dash) % 2 == 0 {
            for o in offsets.clone() {
                if horizontal {
                    put_pixel(out, x, y + o, style.color);
                } else {
                    put_pixel(out, x + o, y, style.color);
                }
            }
        }
        walked += 1;
    };

    // Clockwise from the top-left corner so dashes run continuously
    for x in x0..x1 {
        stroke(&mut out, x, y0, true);
    }
    for y in y0..y1 {
        stroke(&mut out, x1, y, false);
    }
    for x in (x0 + 1..=x1).rev() {
        stroke(&mut out, x, y1, true);
    }
    for y in (y0 + 1..=y1).rev() {
        stroke(&mut out, x0, y, false);
    }

    out
}

fn put_pixel(image: &mut Bitmap, x: i64, y: i64, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= i64::from(image.width) || y >= i64::from(image.height) {
        return;
    }
    let idx = (y as usize * image.width as usize + x as usize) * 4;
    image.pixels[idx..idx + 4].copy_from_slice(&color);
}
