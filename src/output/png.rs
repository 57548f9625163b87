use super::OutputSink;
use anyhow::{Context, Result};
use image::{GrayImage, ImageFormat, RgbaImage};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes `<name>.png` (and `<name>.matte.png`) into an output directory
///
/// Each file is encoded into its own temporary file next to the destination
/// and persisted into place, so a failed write never leaves a partial PNG
/// behind and concurrent sinks never share a temporary file.
pub struct PngSink {
    dir: PathBuf,
    name: String,
    written: Vec<PathBuf>,
}

impl PngSink {
    pub fn new<P: AsRef<Path>>(dir: P, name: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            name: name.to_string(),
            written: Vec::new(),
        }
    }

    pub fn image_path(&self) -> PathBuf {
        self.dir.join(format!("{}.png", self.name))
    }

    pub fn matte_path(&self) -> PathBuf {
        self.dir.join(format!("{}.matte.png", self.name))
    }

    fn write_atomic(
        &mut self,
        path: PathBuf,
        encode: impl FnOnce(&mut File) -> image::ImageResult<()>,
    ) -> Result<()> {
        let mut partial = NamedTempFile::new_in(&self.dir).with_context(|| {
            format!("Failed to create temporary file in {}", self.dir.display())
        })?;

        encode(partial.as_file_mut())
            .with_context(|| format!("Failed to encode {}", path.display()))?;

        partial
            .persist(&path)
            .with_context(|| format!("Failed to move PNG into {}", path.display()))?;

        tracing::debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

impl OutputSink for PngSink {
    fn write_image(&mut self, image: &RgbaImage) -> Result<()> {
        let path = self.image_path();
        self.write_atomic(path, |file| image.write_to(file, ImageFormat::Png))
    }

    fn write_matte(&mut self, matte: &GrayImage) -> Result<()> {
        let path = self.matte_path();
        self.write_atomic(path, |file| matte.write_to(file, ImageFormat::Png))
    }

    fn discard(&mut self) -> Result<()> {
        for path in self.written.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!("Removed {}", path.display()),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to remove {}", path.display()));
                }
            }
        }
        Ok(())
    }
}
