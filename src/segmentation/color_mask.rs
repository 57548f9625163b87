use image::{Rgba, RgbaImage};

use super::types::{brightness, BackgroundColor, Mask, OPAQUE};
use crate::config::Tolerances;

/// Close to the backdrop color and light enough to be paper
#[inline]
pub fn is_near_background(
    pixel: &Rgba<u8>,
    background: &BackgroundColor,
    tolerances: &Tolerances,
) -> bool {
    background.distance(pixel) < tolerances.color_tolerance
        && brightness(pixel) > tolerances.brightness_floor
}

/// Bright enough to be backdrop whatever its color
#[inline]
pub fn is_near_white(pixel: &Rgba<u8>, tolerances: &Tolerances) -> bool {
    brightness(pixel) > tolerances.brightness_ceiling
}

/// Build the initial mask: 0 for backdrop, 255 for everything else
///
/// The two rules are independent; either one marks a pixel as backdrop.
pub fn color_distance_mask(
    image: &RgbaImage,
    background: &BackgroundColor,
    tolerances: &Tolerances,
) -> Mask {
    let _span = tracing::debug_span!("color_mask").entered();

    let (width, height) = image.dimensions();
    let mask = Mask::from_shape_fn((height as usize, width as usize), |(y, x)| {
        let pixel = image.get_pixel(x as u32, y as u32);
        if is_near_background(pixel, background, tolerances) || is_near_white(pixel, tolerances) {
            0
        } else {
            OPAQUE
        }
    });

    tracing::debug!(
        "Color mask cleared {} of {} pixels",
        mask.iter().filter(|&&value| value == 0).count(),
        mask.len()
    );

    mask
}
