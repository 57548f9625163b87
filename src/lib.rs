//! # gridcut
//!
//! Removes ruled-grid backdrops from scanned or photographed artwork.
//!
//! The background is estimated from the image corners, pixels close to it
//! are cleared, long light rows and columns (grid rules) are cleared, and
//! anything cleared that still shows color is restored. The resulting alpha
//! edge is then smoothed. Opaque pixels always keep their original RGB.
//!
//! ```no_run
//! use gridcut::{BackgroundRemover, GridBackgroundRemover, Tolerances};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let image = image::open("Logo.jpg")?.into_rgba8();
//! let remover = GridBackgroundRemover::new(Tolerances::default())?;
//! let cutout = remover.remove_background(&image)?;
//! cutout.save("logo.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! Tuned for uniform light grids behind comparatively saturated or dark
//! artwork; not a general-purpose background remover.

pub mod batch;
pub mod config;
mod error;
pub mod output;
pub mod segmentation;
pub mod source;

pub use config::{BackgroundSampling, Tolerances};
pub use error::SegmentError;
pub use segmentation::{
    create_default_remover, decode_raw, from_dynamic, BackgroundColor, BackgroundRemover,
    GridBackgroundRemover, Mask, PassTrace, Stage,
};
