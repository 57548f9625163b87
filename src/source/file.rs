use super::ImageSource;
use crate::error::SegmentError;
use crate::segmentation::from_dynamic;
use anyhow::{Context, Result};
use image::{ImageReader, RgbaImage};
use std::path::{Path, PathBuf};

/// Image file on disk, decoded with whatever codec its content matches
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileSource {
    fn read_image(&mut self) -> Result<RgbaImage> {
        tracing::debug!("Decoding {}", self.path.display());

        let reader = ImageReader::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?
            .with_guessed_format()
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let decoded = reader
            .decode()
            .map_err(|err| SegmentError::format(err.to_string()))
            .with_context(|| format!("Failed to decode {}", self.path.display()))?;

        let image = from_dynamic(decoded)
            .with_context(|| format!("Unusable image in {}", self.path.display()))?;

        Ok(image)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
