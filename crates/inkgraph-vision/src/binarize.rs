//! Binarization and ruled-line removal.
//!
//! Foreground (ink) is `255` and background is `0` in every image produced
//! here, which is what contour tracing expects.

use image::{GrayImage, Luma};
use imageproc::{drawing::draw_filled_rect_mut, filter::gaussian_blur_f32, rect::Rect};

const INK: u8 = 255;
const PAPER: u8 = 0;

/// Gaussian sigma matching a square smoothing window of `block_size` pixels.
fn block_sigma(block_size: u32) -> f32 {
    0.3 * ((block_size.max(3) as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Inverted adaptive Gaussian threshold.
///
/// A pixel becomes ink when it is at most its Gaussian-weighted
/// neighbourhood mean minus `offset`, so dark strokes on light paper end up
/// white on black.
pub fn adaptive_threshold(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let smoothed = gaussian_blur_f32(gray, block_sigma(block_size));
    let mut binary = GrayImage::new(gray.width(), gray.height());

    for (x, y, pixel) in gray.enumerate_pixels() {
        let threshold = i32::from(smoothed.get_pixel(x, y)[0]) - offset;
        let value = if i32::from(pixel[0]) <= threshold {
            INK
        } else {
            PAPER
        };
        binary.put_pixel(x, y, Luma([value]));
    }

    binary
}

/// Horizontal erosion or dilation with a `1 x width` structuring element.
///
/// The window covers `[x - width / 2, x + width - width / 2 - 1]`. Pixels
/// outside the image never constrain the result.
fn horizontal_morph(image: &GrayImage, width: u32, erode: bool) -> GrayImage {
    let (w, h) = image.dimensions();
    let before = i64::from(width / 2);
    let after = i64::from(width) - before - 1;
    let mut out = GrayImage::new(w, h);
    let mut prefix = vec![0u32; w as usize + 1];

    for y in 0..h {
        for x in 0..w {
            let ink = u32::from(image.get_pixel(x, y)[0] != PAPER);
            prefix[x as usize + 1] = prefix[x as usize] + ink;
        }
        for x in 0..w {
            let lo = (i64::from(x) - before).max(0) as usize;
            let hi = (i64::from(x) + after).min(i64::from(w) - 1) as usize;
            let count = prefix[hi + 1] - prefix[lo];
            let span = (hi + 1 - lo) as u32;
            let set = if erode { count == span } else { count > 0 };
            if set {
                out.put_pixel(x, y, Luma([INK]));
            }
        }
    }

    out
}

/// Morphological opening with a horizontal line element.
///
/// `iterations` erosions are followed by as many dilations, which keeps only
/// horizontal runs long enough to be ruled lines rather than handwriting.
pub fn open_horizontal(binary: &GrayImage, kernel_width: u32, iterations: u32) -> GrayImage {
    let mut image = binary.clone();
    for _ in 0..iterations {
        image = horizontal_morph(&image, kernel_width, true);
    }
    for _ in 0..iterations {
        image = horizontal_morph(&image, kernel_width, false);
    }
    image
}

/// Paints a square brush of side `thickness` centred on each point.
pub fn erase_points(
    image: &mut GrayImage,
    points: impl IntoIterator<Item = (i32, i32)>,
    thickness: u32,
) {
    let thickness = thickness.max(1);
    let half = (thickness / 2) as i32;
    for (x, y) in points {
        let brush = Rect::at(x - half, y - half).of_size(thickness, thickness);
        draw_filled_rect_mut(image, brush, Luma([PAPER]));
    }
}
