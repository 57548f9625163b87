use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use gridcut::batch::process_files;
use gridcut::{create_default_remover, BackgroundSampling, Tolerances};
use std::path::PathBuf;
use std::time::Instant;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Preset {
    /// Color distance, line suppression and full foreground protection
    Full,
    /// Color distance and saturation protection only
    Simple,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Remove ruled-grid backgrounds from artwork", long_about = None)]
struct Args {
    /// Input image files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory receiving <stem>.png for every input (<stem>-2.png, ... on clashes)
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// TOML file with tolerances; command-line overrides win
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting tolerances when no config file is given
    #[arg(long, value_enum, default_value_t = Preset::Full)]
    preset: Preset,

    /// Max RGB distance from the background color
    #[arg(long)]
    color_tolerance: Option<f32>,

    /// Min brightness for the color-distance rule
    #[arg(long)]
    brightness_floor: Option<f32>,

    /// Brightness above which any pixel is background
    #[arg(long)]
    brightness_ceiling: Option<f32>,

    /// Run length, as a fraction of width/height, that marks a grid line
    #[arg(long)]
    line_run_fraction: Option<f32>,

    /// Channel spread above which a pixel is protected as artwork
    #[arg(long)]
    saturation_threshold: Option<u8>,

    /// How to estimate the background color
    #[arg(long, value_enum)]
    sampling: Option<BackgroundSampling>,

    /// Keep hard alpha edges
    #[arg(long)]
    no_smooth: bool,

    /// Also write <name>.matte.png with the final confidence mask
    #[arg(long)]
    show_matte: bool,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn tolerances(&self) -> Result<Tolerances> {
        let mut tolerances = match (&self.config, self.preset) {
            (Some(path), _) => Tolerances::from_toml_file(path)?,
            (None, Preset::Full) => Tolerances::default(),
            (None, Preset::Simple) => Tolerances::simple(),
        };

        if let Some(value) = self.color_tolerance {
            tolerances.color_tolerance = value;
        }
        if let Some(value) = self.brightness_floor {
            tolerances.brightness_floor = value;
        }
        if let Some(value) = self.brightness_ceiling {
            tolerances.brightness_ceiling = value;
        }
        if let Some(value) = self.line_run_fraction {
            tolerances.line_run_fraction = value;
        }
        if let Some(value) = self.saturation_threshold {
            tolerances.saturation_threshold = value;
        }
        if let Some(sampling) = self.sampling {
            tolerances.sampling = sampling;
        }
        if self.no_smooth {
            tolerances.smooth_edges = false;
        }

        Ok(tolerances)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let tolerances = args.tolerances()?;
    tracing::debug!("Tolerances: {:?}", tolerances);

    let remover = create_default_remover(tolerances).context("Invalid tolerances")?;

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    tracing::info!(
        "Processing {} file(s) into {}",
        args.inputs.len(),
        args.output_dir.display()
    );

    let start = Instant::now();
    let reports = process_files(
        remover.as_ref(),
        &args.inputs,
        &args.output_dir,
        args.show_matte,
    );
    let failed = reports.iter().filter(|report| report.result.is_err()).count();

    tracing::info!(
        "Done: {} succeeded, {} failed in {:.1}s",
        reports.len() - failed,
        failed,
        start.elapsed().as_secs_f64()
    );

    if failed > 0 {
        bail!("{failed} of {} file(s) failed", reports.len());
    }

    Ok(())
}
