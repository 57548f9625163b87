use image::{Rgba, RgbaImage};

use super::types::{Mask, OPAQUE};
use crate::config::Tolerances;

/// Blue clearly above both red and green
#[inline]
pub fn has_blue_cast(pixel: &Rgba<u8>, margin: u8) -> bool {
    let [red, green, blue, _] = pixel.0.map(i16::from);
    let margin = i16::from(margin);
    blue > red + margin && blue > green + margin
}

/// Max minus min across R, G and B
#[inline]
pub fn channel_spread(pixel: &Rgba<u8>) -> u8 {
    let [red, green, blue, _] = pixel.0;
    red.max(green).max(blue) - red.min(green).min(blue)
}

#[inline]
pub fn is_saturated(pixel: &Rgba<u8>, threshold: u8) -> bool {
    channel_spread(pixel) > threshold
}

/// Whether a cleared pixel looks like artwork and must be restored
#[inline]
pub fn is_protected(pixel: &Rgba<u8>, tolerances: &Tolerances) -> bool {
    (tolerances.protect_blue_cast && has_blue_cast(pixel, tolerances.blue_margin))
        || is_saturated(pixel, tolerances.saturation_threshold)
}

/// Restore cleared pixels that show color
///
/// Overrides both the color mask and line suppression. Reads the original
/// RGB; returns the number of pixels restored.
pub fn protect_foreground(image: &RgbaImage, mask: &mut Mask, tolerances: &Tolerances) -> usize {
    let _span = tracing::debug_span!("protection").entered();

    let mut restored = 0;
    for ((y, x), confidence) in mask.indexed_iter_mut() {
        if *confidence == 0 && is_protected(image.get_pixel(x as u32, y as u32), tolerances) {
            *confidence = OPAQUE;
            restored += 1;
        }
    }

    tracing::debug!("Restored {} pixels", restored);

    restored
}
