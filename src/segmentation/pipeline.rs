use image::{Rgba, RgbaImage};

use super::background::estimate_background;
use super::color_mask::color_distance_mask;
use super::lines::suppress_grid_lines;
use super::preprocess::validate_dimensions;
use super::protect::protect_foreground;
use super::smooth::smooth_mask;
use super::types::{BackgroundRemover, Mask, PassTrace, Stage, OPAQUE};
use crate::config::Tolerances;
use crate::error::SegmentError;

/// Grid backdrop remover
///
/// Runs the passes in a fixed order over one image:
/// background estimate, color mask, line suppression, protection,
/// smoothing. Each pass only narrows or restores the mask produced by the
/// previous one; RGB is never modified except for fully cleared pixels.
#[derive(Debug, Clone, Default)]
pub struct GridBackgroundRemover {
    tolerances: Tolerances,
}

impl GridBackgroundRemover {
    /// Create a remover, rejecting tolerances the passes cannot use
    pub fn new(tolerances: Tolerances) -> Result<Self, SegmentError> {
        tolerances.validate()?;
        Ok(Self { tolerances })
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Like [`BackgroundRemover::remove_background`], also returning the mask
    /// as it stood after every pass
    pub fn remove_background_traced(
        &self,
        image: &RgbaImage,
    ) -> Result<(RgbaImage, PassTrace), SegmentError> {
        let mut trace = PassTrace::default();
        let mask = self.run(image, Some(&mut trace))?;
        Ok((compose(image, &mask), trace))
    }

    fn run(
        &self,
        image: &RgbaImage,
        mut trace: Option<&mut PassTrace>,
    ) -> Result<Mask, SegmentError> {
        let _span = tracing::debug_span!("grid_segment").entered();

        validate_dimensions(image.width(), image.height())?;
        let tolerances = &self.tolerances;

        let mut record = |stage: Stage, mask: &Mask| {
            if let Some(trace) = trace.as_deref_mut() {
                trace.record(stage, mask);
            }
        };

        let background = estimate_background(image, tolerances);

        let mut mask = color_distance_mask(image, &background, tolerances);
        record(Stage::ColorMask, &mask);

        if tolerances.suppress_lines {
            suppress_grid_lines(image, &mut mask, tolerances);
            record(Stage::LineSuppression, &mask);
        }

        protect_foreground(image, &mut mask, tolerances);
        record(Stage::Protection, &mask);

        if tolerances.smooth_edges {
            mask = smooth_mask(&mask, tolerances.min_confidence);
            record(Stage::Smoothing, &mask);
        }

        Ok(mask)
    }
}

impl BackgroundRemover for GridBackgroundRemover {
    fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage, SegmentError> {
        let mask = self.run(image, None)?;
        Ok(compose(image, &mask))
    }

    fn segment(&self, image: &RgbaImage) -> Result<Mask, SegmentError> {
        self.run(image, None)
    }
}

/// Scale each pixel's alpha by its confidence
///
/// Pixels that end fully transparent are written as `[0, 0, 0, 0]`; all
/// others keep their RGB unchanged.
pub fn compose(image: &RgbaImage, mask: &Mask) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([red, green, blue, alpha]) = *image.get_pixel(x, y);
        let confidence = u32::from(mask[[y as usize, x as usize]]);
        let scaled = (u32::from(alpha) * confidence + u32::from(OPAQUE) / 2) / u32::from(OPAQUE);

        if scaled == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([red, green, blue, scaled as u8])
        }
    })
}
