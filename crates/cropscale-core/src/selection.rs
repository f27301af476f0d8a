//! Pointer-driven crop selection.
//!
//! Tracks a single drag at a time: `Idle -> Selecting -> Idle`. Releasing the
//! pointer yields either ratio-space crop coordinates or a request to clear
//! the crop when the dragged rectangle has no area.

use crate::geometry::{to_canvas_pixels, to_ratios, CanvasPoint, CropRatios, DisplayRect, PixelRect};

/// A pointer event in display space, with the element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    pub display: DisplayRect,
}

impl PointerInput {
    pub fn new(x: f64, y: f64, display: DisplayRect) -> Self {
        Self { x, y, display }
    }
}

/// Where the preview canvas sits inside the base image.
///
/// With no crop the canvas is the whole base. With a crop it shows the crop
/// rectangle, so selections must be offset before converting to ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewFrame {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Canvas origin in base pixels.
    pub origin_x: u32,
    pub origin_y: u32,
    pub base_width: u32,
    pub base_height: u32,
}

impl PreviewFrame {
    /// A frame showing the whole base image.
    pub fn full(base_width: u32, base_height: u32) -> Self {
        Self {
            canvas_width: base_width,
            canvas_height: base_height,
            origin_x: 0,
            origin_y: 0,
            base_width,
            base_height,
        }
    }

    fn map(&self, input: &PointerInput) -> Option<CanvasPoint> {
        to_canvas_pixels(
            input.x,
            input.y,
            &input.display,
            self.canvas_width,
            self.canvas_height,
        )
    }

    /// Ratios of the base image covered by a canvas rectangle.
    pub fn rect_to_ratios(&self, rect: &PixelRect) -> Option<CropRatios> {
        let in_base = rect.translate(self.origin_x as f64, self.origin_y as f64);
        to_ratios(&in_base, self.base_width, self.base_height)
    }
}

/// Selection state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum SelectionState {
    #[default]
    Idle,
    Selecting {
        anchor: CanvasPoint,
        current: CanvasPoint,
    },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionOutcome {
    /// No drag was in progress.
    Ignored,
    /// A rectangle with area was selected.
    Committed(CropRatios),
    /// The drag had zero width or height; any crop should be cleared.
    Cleared,
}

/// Drag tracker for the preview canvas.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    state: SelectionState,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SelectionState::Selecting { .. })
    }

    /// Start a drag. A second down while selecting restarts the anchor.
    ///
    /// Returns false if the pointer could not be mapped onto the canvas.
    pub fn pointer_down(&mut self, input: &PointerInput, frame: &PreviewFrame) -> bool {
        match frame.map(input) {
            Some(anchor) => {
                self.state = SelectionState::Selecting {
                    anchor,
                    current: anchor,
                };
                true
            }
            None => false,
        }
    }

    /// Update the live rectangle. Returns it for overlay drawing.
    pub fn pointer_move(&mut self, input: &PointerInput, frame: &PreviewFrame) -> Option<PixelRect> {
        let SelectionState::Selecting { anchor, .. } = self.state else {
            return None;
        };
        let current = frame.map(input)?;
        self.state = SelectionState::Selecting { anchor, current };
        Some(PixelRect::from_corners(anchor, current))
    }

    /// Finish the drag and convert the rectangle to base-image ratios.
    pub fn pointer_up(&mut self, input: &PointerInput, frame: &PreviewFrame) -> SelectionOutcome {
        let SelectionState::Selecting { anchor, current } = self.state else {
            return SelectionOutcome::Ignored;
        };
        self.state = SelectionState::Idle;

        // An unmappable release point falls back to the last tracked position.
        let end = frame.map(input).unwrap_or(current);
        let rect = PixelRect::from_corners(anchor, end);

        match frame.rect_to_ratios(&rect) {
            Some(ratios) => SelectionOutcome::Committed(ratios),
            None => SelectionOutcome::Cleared,
        }
    }

    /// Drop any drag in progress.
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn at(x: f64, y: f64, frame: &PreviewFrame) -> PointerInput {
        // Display box matches the canvas one-to-one
        PointerInput::new(
            x,
            y,
            DisplayRect::new(
                0.0,
                0.0,
                frame.canvas_width as f64,
                frame.canvas_height as f64,
            ),
        )
    }

    #[test]
    fn test_drag_commits_ratios() {
        let frame = PreviewFrame::full(500, 400);
        let mut sel = Selection::new();

        assert!(sel.pointer_down(&at(100.0, 100.0, &frame), &frame));
        assert!(sel.is_selecting());

        let outcome = sel.pointer_up(&at(300.0, 250.0, &frame), &frame);
        let SelectionOutcome::Committed(r) = outcome else {
            panic!("expected commit, got {:?}", outcome);
        };
        assert!((r.x - 0.2).abs() < EPS);
        assert!((r.y - 0.25).abs() < EPS);
        assert!((r.width - 0.4).abs() < EPS);
        assert!((r.height - 0.375).abs() < EPS);
        assert!(!sel.is_selecting());
    }

    #[test]
    fn test_zero_area_clears() {
        let frame = PreviewFrame::full(500, 400);
        let mut sel = Selection::new();

        sel.pointer_down(&at(120.0, 80.0, &frame), &frame);
        let outcome = sel.pointer_up(&at(120.0, 80.0, &frame), &frame);

        assert_eq!(outcome, SelectionOutcome::Cleared);
    }

    #[test]
    fn test_horizontal_line_clears() {
        let frame = PreviewFrame::full(500, 400);
        let mut sel = Selection::new();

        sel.pointer_down(&at(10.0, 80.0, &frame), &frame);
        assert_eq!(
            sel.pointer_up(&at(200.0, 80.0, &frame), &frame),
            SelectionOutcome::Cleared
        );
    }

    #[test]
    fn test_up_without_down_is_ignored() {
        let frame = PreviewFrame::full(500, 400);
        let mut sel = Selection::new();
        assert_eq!(
            sel.pointer_up(&at(10.0, 10.0, &frame), &frame),
            SelectionOutcome::Ignored
        );
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let frame = PreviewFrame::full(500, 400);
        let mut sel = Selection::new();
        assert!(sel.pointer_move(&at(10.0, 10.0, &frame), &frame).is_none());
    }

    #[test]
    fn test_move_reports_live_rect() {
        let frame = PreviewFrame::full(500, 400);
        let mut sel = Selection::new();

        sel.pointer_down(&at(300.0, 300.0, &frame), &frame);
        let rect = sel.pointer_move(&at(100.0, 50.0, &frame), &frame).unwrap();

        assert_eq!(
            rect,
            PixelRect {
                x: 100.0,
                y: 50.0,
                width: 200.0,
                height: 250.0
            }
        );
        assert!(sel.is_selecting());
    }

    #[test]
    fn test_move_outside_canvas_is_clamped() {
        let frame = PreviewFrame::full(500, 400);
        let mut sel = Selection::new();

        sel.pointer_down(&at(400.0, 300.0, &frame), &frame);
        let rect = sel.pointer_move(&at(9000.0, 9000.0, &frame), &frame).unwrap();

        assert_eq!(rect.x + rect.width, 500.0);
        assert_eq!(rect.y + rect.height, 400.0);
    }

    #[test]
    fn test_second_down_restarts_anchor() {
        let frame = PreviewFrame::full(100, 100);
        let mut sel = Selection::new();

        sel.pointer_down(&at(10.0, 10.0, &frame), &frame);
        sel.pointer_down(&at(50.0, 50.0, &frame), &frame);
        let SelectionOutcome::Committed(r) = sel.pointer_up(&at(60.0, 70.0, &frame), &frame) else {
            panic!("expected commit");
        };

        assert!((r.x - 0.5).abs() < EPS);
        assert!((r.width - 0.1).abs() < EPS);
        assert!((r.height - 0.2).abs() < EPS);
    }

    #[test]
    fn test_css_scaled_selection() {
        let frame = PreviewFrame::full(1000, 800);
        let display = DisplayRect::new(0.0, 0.0, 500.0, 400.0);
        let mut sel = Selection::new();

        sel.pointer_down(&PointerInput::new(50.0, 50.0, display), &frame);
        let SelectionOutcome::Committed(r) =
            sel.pointer_up(&PointerInput::new(150.0, 125.0, display), &frame)
        else {
            panic!("expected commit");
        };

        // Display (50,50)-(150,125) is canvas (100,100)-(300,250)
        assert!((r.x - 0.1).abs() < EPS);
        assert!((r.y - 0.125).abs() < EPS);
        assert!((r.width - 0.2).abs() < EPS);
        assert!((r.height - 0.1875).abs() < EPS);
    }

    #[test]
    fn test_selection_on_cropped_preview_maps_into_base() {
        // Canvas shows base pixels (200,200)-(600,500) of a 1000x800 base
        let frame = PreviewFrame {
            canvas_width: 400,
            canvas_height: 300,
            origin_x: 200,
            origin_y: 200,
            base_width: 1000,
            base_height: 800,
        };
        let mut sel = Selection::new();

        sel.pointer_down(&at(0.0, 0.0, &frame), &frame);
        let SelectionOutcome::Committed(r) = sel.pointer_up(&at(100.0, 100.0, &frame), &frame) else {
            panic!("expected commit");
        };

        assert!((r.x - 0.2).abs() < EPS);
        assert!((r.y - 0.25).abs() < EPS);
        assert!((r.width - 0.1).abs() < EPS);
        assert!((r.height - 0.125).abs() < EPS);
    }

    #[test]
    fn test_unmappable_down_is_rejected() {
        let frame = PreviewFrame::full(100, 100);
        let mut sel = Selection::new();
        let input = PointerInput::new(5.0, 5.0, DisplayRect::new(0.0, 0.0, 0.0, 0.0));

        assert!(!sel.pointer_down(&input, &frame));
        assert!(!sel.is_selecting());
    }

    #[test]
    fn test_cancel() {
        let frame = PreviewFrame::full(100, 100);
        let mut sel = Selection::new();
        sel.pointer_down(&at(5.0, 5.0, &frame), &frame);
        sel.cancel();
        assert!(!sel.is_selecting());
        assert_eq!(sel.pointer_up(&at(50.0, 50.0, &frame), &frame), SelectionOutcome::Ignored);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: pressing and releasing at the same point never commits.
        #[test]
        fn prop_click_never_commits(
            x in -100.0f64..700.0,
            y in -100.0f64..500.0,
            w in 1u32..2000,
            h in 1u32..2000,
        ) {
            let frame = PreviewFrame::full(w, h);
            let display = DisplayRect::new(0.0, 0.0, 600.0, 400.0);
            let input = PointerInput::new(x, y, display);
            let mut sel = Selection::new();

            sel.pointer_down(&input, &frame);
            prop_assert_eq!(sel.pointer_up(&input, &frame), SelectionOutcome::Cleared);
        }

        /// Property: committed ratios always respect the unit-square invariant.
        #[test]
        fn prop_committed_ratios_valid(
            ax in -200.0f64..800.0, ay in -200.0f64..800.0,
            bx in -200.0f64..800.0, by in -200.0f64..800.0,
        ) {
            let frame = PreviewFrame::full(500, 400);
            let display = DisplayRect::new(0.0, 0.0, 500.0, 400.0);
            let mut sel = Selection::new();

            sel.pointer_down(&PointerInput::new(ax, ay, display), &frame);
            if let SelectionOutcome::Committed(r) =
                sel.pointer_up(&PointerInput::new(bx, by, display), &frame)
            {
                prop_assert!(r.width > 0.0 && r.height > 0.0);
                prop_assert!(r.x + r.width <= 1.0 + 1e-12);
                prop_assert!(r.y + r.height <= 1.0 + 1e-12);
            }
        }
    }
}
