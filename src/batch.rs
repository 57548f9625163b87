//! Per-file driver: decode, remove the grid, encode.
//!
//! Each file gets its own buffers and its own output name, so files can be
//! processed in parallel and one failure never affects its siblings.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use image::{GrayImage, RgbaImage};
use rayon::prelude::*;

use crate::output::{OutputSink, PngSink};
use crate::segmentation::{compose, mask_to_gray, BackgroundRemover};
use crate::source::{FileSource, ImageSource};

/// Outcome of one input file
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub result: Result<Duration>,
}

/// Run one image from `source` through `remover` into `sink`
///
/// Nothing is left in the sink unless every output was written: a failed
/// write discards whatever this image already wrote.
pub fn process_image<R, S, O>(
    remover: &R,
    source: &mut S,
    sink: &mut O,
    show_matte: bool,
) -> Result<()>
where
    R: BackgroundRemover + ?Sized,
    S: ImageSource,
    O: OutputSink,
{
    let _span = tracing::info_span!("image", name = source.name()).entered();

    let image = source.read_image()?;
    let (width, height) = image.dimensions();
    tracing::debug!("Processing {}x{}", width, height);

    let mask = remover
        .segment(&image)
        .context("Failed to remove background")?;
    let output = compose(&image, &mask);
    let matte = show_matte.then(|| mask_to_gray(&mask));

    if let Err(err) = write_outputs(sink, &output, matte.as_ref()) {
        if let Err(cleanup) = sink.discard() {
            tracing::warn!("Partial output left behind: {:#}", cleanup);
        }
        return Err(err);
    }

    Ok(())
}

fn write_outputs<O: OutputSink>(
    sink: &mut O,
    output: &RgbaImage,
    matte: Option<&GrayImage>,
) -> Result<()> {
    if let Some(matte) = matte {
        sink.write_matte(matte).context("Failed to write matte")?;
    }
    sink.write_image(output).context("Failed to write image")
}

/// Output names for `inputs`, in input order
///
/// Each name is the file stem; a stem whose files an earlier input already
/// claimed gets `-2`, `-3`, ... appended. Claims ignore case.
pub fn output_names(inputs: &[PathBuf]) -> Vec<String> {
    fn files(name: &str) -> [String; 2] {
        [format!("{name}.png"), format!("{name}.matte.png")].map(|file| file.to_lowercase())
    }

    let mut claimed = HashSet::new();

    inputs
        .iter()
        .map(|input| {
            let source = FileSource::new(input);
            let stem = source.name();
            let mut name = stem.to_string();
            let mut suffix = 2;
            while files(&name).iter().any(|file| claimed.contains(file)) {
                name = format!("{stem}-{suffix}");
                suffix += 1;
            }
            claimed.extend(files(&name));
            name
        })
        .collect()
}

/// Process every input into `output_dir`, named by [`output_names`]
///
/// Reports come back in input order.
pub fn process_files<R>(
    remover: &R,
    inputs: &[PathBuf],
    output_dir: &Path,
    show_matte: bool,
) -> Vec<FileReport>
where
    R: BackgroundRemover + Sync + ?Sized,
{
    let names = output_names(inputs);

    inputs
        .par_iter()
        .zip(names.par_iter())
        .map(|(input, name)| {
            let start = Instant::now();
            let mut source = FileSource::new(input);
            let mut sink = PngSink::new(output_dir, name);
            let result = process_image(remover, &mut source, &mut sink, show_matte)
                .map(|()| start.elapsed());

            match &result {
                Ok(elapsed) => tracing::info!(
                    "{} -> {} ({:.1}ms)",
                    input.display(),
                    sink.image_path().display(),
                    elapsed.as_secs_f64() * 1000.0
                ),
                Err(err) => tracing::warn!("{}: {:#}", input.display(), err),
            }

            FileReport {
                input: input.clone(),
                result,
            }
        })
        .collect()
}
