use image::{Rgba, RgbaImage};

use super::types::{brightness, Mask};
use crate::config::Tolerances;

/// Still visible and light enough to belong to a grid rule
#[inline]
pub fn extends_line_run(pixel: &Rgba<u8>, confidence: u8, tolerances: &Tolerances) -> bool {
    confidence > 0 && brightness(pixel) > tolerances.line_brightness
}

/// Longest run of consecutive line pixels along one row or column must
/// exceed this many pixels to count as a grid line.
fn run_threshold(length: u32, tolerances: &Tolerances) -> f32 {
    length as f32 * tolerances.line_run_fraction
}

/// Clear long light runs row by row, then column by column
///
/// The column scan sees what the row scan cleared. Returns the number of
/// rows and columns detected as grid lines.
pub fn suppress_grid_lines(
    image: &RgbaImage,
    mask: &mut Mask,
    tolerances: &Tolerances,
) -> (usize, usize) {
    let _span = tracing::debug_span!("line_suppression").entered();

    let (width, height) = image.dimensions();

    let rows = (0..height)
        .filter(|&y| suppress_lane(image, mask, tolerances, width, |i| (i, y)))
        .count();
    let columns = (0..width)
        .filter(|&x| suppress_lane(image, mask, tolerances, height, |i| (x, i)))
        .count();

    tracing::debug!("Detected {} grid rows and {} grid columns", rows, columns);

    (rows, columns)
}

/// Scan one lane of `length` pixels, addressed through `at`, and clear it if
/// it holds a grid line.
fn suppress_lane(
    image: &RgbaImage,
    mask: &mut Mask,
    tolerances: &Tolerances,
    length: u32,
    at: impl Fn(u32) -> (u32, u32),
) -> bool {
    let threshold = run_threshold(length, tolerances);
    let mut run = 0u32;

    let detected = (0..length).any(|i| {
        let (x, y) = at(i);
        let confidence = mask[[y as usize, x as usize]];
        if extends_line_run(image.get_pixel(x, y), confidence, tolerances) {
            run += 1;
        } else {
            run = 0;
        }
        run as f32 > threshold
    });

    if detected {
        for i in 0..length {
            let (x, y) = at(i);
            if brightness(image.get_pixel(x, y)) > tolerances.line_clear_brightness {
                mask[[y as usize, x as usize]] = 0;
            }
        }
    }

    detected
}
