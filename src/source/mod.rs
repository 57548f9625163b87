mod file;

pub use file::FileSource;

use anyhow::Result;
use image::RgbaImage;

/// Trait for image sources feeding the remover
pub trait ImageSource {
    /// Read and decode the image
    fn read_image(&mut self) -> Result<RgbaImage>;

    /// Name used for output files and reports
    fn name(&self) -> &str;
}
