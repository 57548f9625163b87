use image::{Rgba, RgbaImage};
use ndarray::Array2;

use crate::error::SegmentError;

/// Foreground confidence per pixel: 0 = background, 255 = foreground
/// Indexed `[[y, x]]`, dimensions match the input image
pub type Mask = Array2<u8>;

/// Confidence of a pixel nothing has classified yet
pub const OPAQUE: u8 = 255;

/// Estimated backdrop color, fixed for the rest of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl BackgroundColor {
    /// Euclidean distance between this color and a pixel's RGB
    pub fn distance(&self, pixel: &Rgba<u8>) -> f32 {
        let [red, green, blue, _] = pixel.0;
        let dr = f32::from(red) - self.red;
        let dg = f32::from(green) - self.green;
        let db = f32::from(blue) - self.blue;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// Mean of the R, G and B channels
#[inline]
pub fn brightness(pixel: &Rgba<u8>) -> f32 {
    let [red, green, blue, _] = pixel.0;
    (f32::from(red) + f32::from(green) + f32::from(blue)) / 3.0
}

/// Pipeline stages whose mask can be captured in a [`PassTrace`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ColorMask,
    LineSuppression,
    Protection,
    Smoothing,
}

/// Mask snapshots taken after each pass of one run, in pipeline order
#[derive(Debug, Clone, Default)]
pub struct PassTrace {
    pub stages: Vec<(Stage, Mask)>,
}

impl PassTrace {
    pub(crate) fn record(&mut self, stage: Stage, mask: &Mask) {
        self.stages.push((stage, mask.clone()));
    }

    /// Snapshot taken after `stage`, if that stage ran
    pub fn mask_after(&self, stage: Stage) -> Option<&Mask> {
        self.stages
            .iter()
            .find(|(recorded, _)| *recorded == stage)
            .map(|(_, mask)| mask)
    }
}

/// Trait for background removers
/// Implementations must not keep state between calls, so one value can serve
/// many images concurrently
pub trait BackgroundRemover {
    /// Process an image and return it with the background made transparent
    ///
    /// # Arguments
    /// * `image` - Input RGBA image
    ///
    /// # Returns
    /// * RGBA image of the same dimensions; opaque pixels keep their RGB
    fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage, SegmentError>;

    /// Foreground confidence mask without composing the output image
    fn segment(&self, image: &RgbaImage) -> Result<Mask, SegmentError>;
}
