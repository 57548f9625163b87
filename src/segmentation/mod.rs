mod background;
mod color_mask;
mod lines;
mod pipeline;
mod preprocess;
mod protect;
pub(crate) mod smooth;
pub mod types;

pub use background::estimate_background;
pub use color_mask::{color_distance_mask, is_near_background, is_near_white};
pub use lines::{extends_line_run, suppress_grid_lines};
pub use pipeline::{compose, GridBackgroundRemover};
pub use preprocess::{decode_raw, from_dynamic, mask_to_gray};
pub use protect::{channel_spread, has_blue_cast, is_protected, is_saturated, protect_foreground};
pub use smooth::{smooth_mask, RESTORED_FLOOR};
pub use types::{brightness, BackgroundColor, BackgroundRemover, Mask, PassTrace, Stage};

use crate::config::Tolerances;
use crate::error::SegmentError;

/// Create the default grid remover for the given tolerances
pub fn create_default_remover(
    tolerances: Tolerances,
) -> Result<Box<dyn BackgroundRemover + Send + Sync>, SegmentError> {
    let remover = GridBackgroundRemover::new(tolerances)?;
    Ok(Box::new(remover))
}
