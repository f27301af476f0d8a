//! Image cropping operations.
//!
//! Crops are stored as ratios of the base image and only turned into pixels
//! against the base size of the current render. This keeps the selected
//! region proportionally stable while the scale changes.
//!
//! # Example
//!
//! ```ignore
//! // Crop the center 50% of the image
//! let ratios = CropRatios::new(0.25, 0.25, 0.5, 0.5).unwrap();
//! let cropped = crop_pixels(&base, ratios.to_pixel_rect(base.width, base.height));
//! ```

use crate::decode::Bitmap;
use crate::geometry::CropPixels;

const BYTES_PER_PIXEL: usize = 4;

/// Copy a pixel rectangle out of a bitmap.
///
/// The rectangle is clamped to the bitmap bounds first.
pub fn crop_pixels(image: &Bitmap, rect: CropPixels) -> Bitmap {
    // Fast path: full crop returns a clone
    if rect.x == 0 && rect.y == 0 && rect.width >= image.width && rect.height >= image.height {
        return image.clone();
    }

    let left = rect.x.min(image.width);
    let top = rect.y.min(image.height);
    let out_width = rect.width.min(image.width - left);
    let out_height = rect.height.min(image.height - top);

    let src_stride = image.width as usize * BYTES_PER_PIXEL;
    let row_len = out_width as usize * BYTES_PER_PIXEL;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    // Copy pixel data row by row
    for y in top..top + out_height {
        let start = y as usize * src_stride + left as usize * BYTES_PER_PIXEL;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Bitmap {
        width: out_width,
        height: out_height,
        pixels: output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CropRatios;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    /// Crop by ratios resolved against the image itself, as the pipeline does.
    fn crop_ratios(image: &Bitmap, x: f64, y: f64, w: f64, h: f64) -> Bitmap {
        let ratios = CropRatios::new(x, y, w, h).unwrap();
        crop_pixels(image, ratios.to_pixel_rect(image.width, image.height))
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = crop_ratios(&img, 0.0, 0.0, 1.0, 1.0);

        assert_eq!(result, img);
    }

    #[test]
    fn test_half_crop() {
        let img = test_image(100, 100);
        let result = crop_ratios(&img, 0.0, 0.0, 0.5, 0.5);

        assert_eq!(result.width, 50);
        assert_eq!(result.height, 50);
    }

    #[test]
    fn test_center_crop() {
        let img = test_image(10, 10);
        let result = crop_ratios(&img, 0.2, 0.2, 0.6, 0.6);

        // 0.2 * 10 = 2, 0.6 * 10 = 6
        assert_eq!(result.width, 6);
        assert_eq!(result.height, 6);

        // Value at (2, 2) = 2 * 10 + 2 = 22
        assert_eq!(result.pixels[0], 22);
    }

    #[test]
    fn test_crop_pixel_values_preserved() {
        let img = test_image(10, 10);
        let result = crop_pixels(
            &img,
            CropPixels {
                x: 3,
                y: 3,
                width: 4,
                height: 4,
            },
        );

        // First pixel should be from (3, 3) = 33, last from (6, 6) = 66
        assert_eq!(&result.pixels[0..4], &[33, 33, 33, 255]);
        let last = result.pixels.len() - 4;
        assert_eq!(result.pixels[last], 66);
    }

    #[test]
    fn test_crop_pixels_clamps_to_bounds() {
        let img = test_image(10, 10);
        let result = crop_pixels(
            &img,
            CropPixels {
                x: 8,
                y: 7,
                width: 50,
                height: 50,
            },
        );

        assert_eq!((result.width, result.height), (2, 3));
        assert_eq!(result.pixels.len(), 2 * 3 * 4);
    }

    #[test]
    fn test_crop_rectangular() {
        let img = test_image(200, 100);
        let result = crop_ratios(&img, 0.0, 0.0, 0.25, 1.0);

        assert_eq!(result.width, 50);
        assert_eq!(result.height, 100);
    }

    #[test]
    fn test_crop_minimum_dimension() {
        let img = test_image(100, 100);
        let result = crop_ratios(&img, 0.99, 0.99, 0.001, 0.001);

        assert_eq!((result.width, result.height), (1, 1));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
