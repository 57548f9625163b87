//! Tolerances for the grid background pipeline.
//!
//! Every threshold the passes use lives here so it can be tuned per grid
//! pattern. Values were picked for light ruled-grid backdrops (near-white
//! paper, light gray rules) and need retuning for other spacings or colors.
//!
//! Tolerances can be built in code or read from a TOML file; fields missing
//! from the file keep their defaults:
//!
//! ```toml
//! color_tolerance = 35.0
//! line_run_fraction = 0.5
//! sampling = "flood-fill"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SegmentError;
use crate::segmentation::smooth::RESTORED_FLOOR;

/// How the background color is sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundSampling {
    /// Mean of the four corner pixels
    #[default]
    Corners,
    /// Mean of the regions flood filled from each corner
    FloodFill,
}

/// Invocation-scoped tuning for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tolerances {
    /// Max Euclidean RGB distance from the background color
    pub color_tolerance: f32,
    /// Min mean brightness for the distance rule to apply
    pub brightness_floor: f32,
    /// Mean brightness above which a pixel is background regardless of color
    pub brightness_ceiling: f32,
    /// Brightness a pixel needs to extend a grid-line run
    pub line_brightness: f32,
    /// Brightness above which a pixel on a detected line is cleared
    pub line_clear_brightness: f32,
    /// Run length, as a fraction of the row width or column height, that marks a line
    pub line_run_fraction: f32,
    /// Blue must exceed both red and green by more than this to count as a blue cast
    pub blue_margin: u8,
    /// Channel spread (max - min) above which a pixel is treated as artwork
    pub saturation_threshold: u8,
    /// Smoothed confidence below which a pixel is dropped
    pub min_confidence: u8,
    /// Gray-level step accepted between neighbours while flood filling
    pub flood_tolerance: u8,
    pub sampling: BackgroundSampling,
    pub suppress_lines: bool,
    pub protect_blue_cast: bool,
    pub smooth_edges: bool,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            color_tolerance: 40.0,
            brightness_floor: 180.0,
            brightness_ceiling: 240.0,
            line_brightness: 220.0,
            line_clear_brightness: 200.0,
            line_run_fraction: 0.6,
            blue_margin: 10,
            saturation_threshold: 15,
            min_confidence: 10,
            flood_tolerance: 15,
            sampling: BackgroundSampling::Corners,
            suppress_lines: true,
            protect_blue_cast: true,
            smooth_edges: true,
        }
    }
}

impl Tolerances {
    /// Color distance and saturation protection only: no line suppression,
    /// no blue-cast rule.
    pub fn simple() -> Self {
        Self {
            suppress_lines: false,
            protect_blue_cast: false,
            ..Self::default()
        }
    }

    /// Load tolerances from a TOML file, falling back to defaults per field
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tolerances from {}", path.display()))?;
        let tolerances = Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse tolerances in {}", path.display()))?;
        Ok(tolerances)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let tolerances: Self = toml::from_str(text)?;
        tolerances.validate()?;
        Ok(tolerances)
    }

    /// Check that every threshold is usable by the passes
    pub fn validate(&self) -> Result<(), SegmentError> {
        let thresholds = [
            ("color_tolerance", self.color_tolerance),
            ("brightness_floor", self.brightness_floor),
            ("brightness_ceiling", self.brightness_ceiling),
            ("line_brightness", self.line_brightness),
            ("line_clear_brightness", self.line_clear_brightness),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(SegmentError::tolerance(
                    field,
                    format!("must be a finite non-negative number, got {value}"),
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.line_run_fraction) {
            return Err(SegmentError::tolerance(
                "line_run_fraction",
                format!("must lie in [0, 1], got {}", self.line_run_fraction),
            ));
        }

        // Smoothing never takes an opaque pixel below RESTORED_FLOOR, so a
        // higher cutoff could drop restored artwork.
        if self.min_confidence > RESTORED_FLOOR {
            return Err(SegmentError::tolerance(
                "min_confidence",
                format!(
                    "must not exceed {RESTORED_FLOOR}, got {}",
                    self.min_confidence
                ),
            ));
        }

        Ok(())
    }
}
