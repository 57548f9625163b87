mod png;

pub use png::PngSink;

use anyhow::Result;
use image::{GrayImage, RgbaImage};

/// Trait for output destinations
pub trait OutputSink {
    /// Write the processed image
    fn write_image(&mut self, image: &RgbaImage) -> Result<()>;

    /// Write the confidence mask as a grayscale image
    fn write_matte(&mut self, matte: &GrayImage) -> Result<()>;

    /// Remove everything this sink has written so far
    fn discard(&mut self) -> Result<()>;
}
