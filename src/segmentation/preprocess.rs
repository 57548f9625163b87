use image::{DynamicImage, GrayImage, Luma, RgbImage, RgbaImage};

use super::types::Mask;
use crate::error::SegmentError;

pub(crate) fn validate_dimensions(width: u32, height: u32) -> Result<(), SegmentError> {
    if width == 0 || height == 0 {
        return Err(SegmentError::format(format!(
            "image dimensions must be non-zero, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Build an RGBA image from a raw interleaved buffer
///
/// # Arguments
/// * `channels` - 3 for RGB, 4 for RGBA; RGB input becomes fully opaque
/// * `data` - Row-major samples, exactly `width * height * channels` long
pub fn decode_raw(
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
) -> Result<RgbaImage, SegmentError> {
    validate_dimensions(width, height)?;

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(usize::from(channels)))
        .ok_or_else(|| SegmentError::format(format!("{width}x{height} buffer is too large")))?;
    if data.len() != expected {
        return Err(SegmentError::format(format!(
            "expected {expected} bytes for {width}x{height} with {channels} channels, got {}",
            data.len()
        )));
    }

    let image = match channels {
        3 => RgbImage::from_raw(width, height, data)
            .map(|rgb| DynamicImage::ImageRgb8(rgb).into_rgba8()),
        4 => RgbaImage::from_raw(width, height, data),
        other => {
            return Err(SegmentError::format(format!(
                "expected 3 or 4 channels, got {other}"
            )))
        }
    };

    image.ok_or_else(|| SegmentError::format("buffer does not fit image dimensions"))
}

/// Convert any decoded image to RGBA8
pub fn from_dynamic(image: DynamicImage) -> Result<RgbaImage, SegmentError> {
    validate_dimensions(image.width(), image.height())?;
    Ok(image.into_rgba8())
}

/// Render a mask as a grayscale image for inspection
pub fn mask_to_gray(mask: &Mask) -> GrayImage {
    let (height, width) = mask.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([mask[[y as usize, x as usize]]])
    })
}
