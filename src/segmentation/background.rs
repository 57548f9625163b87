use std::collections::VecDeque;

use image::{imageops, RgbaImage};
use ndarray::Array2;

use super::types::BackgroundColor;
use crate::config::{BackgroundSampling, Tolerances};

/// Estimate the backdrop color from the image border
///
/// Corners are assumed to show backdrop. When artwork touches a corner the
/// estimate is biased and later passes degrade; nothing here detects that.
///
/// An empty image has no corners and yields black.
pub fn estimate_background(image: &RgbaImage, tolerances: &Tolerances) -> BackgroundColor {
    let _span = tracing::debug_span!("estimate_background").entered();

    if image.width() == 0 || image.height() == 0 {
        return mean_color(image, std::iter::empty());
    }

    let color = match tolerances.sampling {
        BackgroundSampling::Corners => corner_mean(image),
        BackgroundSampling::FloodFill => flood_fill_mean(image, tolerances.flood_tolerance),
    };

    tracing::debug!(
        "Background estimate: ({:.1}, {:.1}, {:.1})",
        color.red,
        color.green,
        color.blue
    );

    color
}

fn corners(width: u32, height: u32) -> [(u32, u32); 4] {
    [
        (0, 0),
        (width - 1, 0),
        (0, height - 1),
        (width - 1, height - 1),
    ]
}

fn corner_mean(image: &RgbaImage) -> BackgroundColor {
    let (width, height) = image.dimensions();
    mean_color(image, corners(width, height).into_iter())
}

/// Mean color of everything reachable from a corner through small gray steps
fn flood_fill_mean(image: &RgbaImage, step: u8) -> BackgroundColor {
    let (width, height) = image.dimensions();
    let gray = imageops::grayscale(image);
    let mut filled = Array2::from_elem((height as usize, width as usize), false);
    let mut queue = VecDeque::new();

    for (x, y) in corners(width, height) {
        if !filled[[y as usize, x as usize]] {
            filled[[y as usize, x as usize]] = true;
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let level = gray.get_pixel(x, y)[0];
        let neighbours = [
            (x.checked_sub(1), Some(y)),
            ((x + 1 < width).then_some(x + 1), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), (y + 1 < height).then_some(y + 1)),
        ];

        for (nx, ny) in neighbours {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            if filled[[ny as usize, nx as usize]] {
                continue;
            }
            if gray.get_pixel(nx, ny)[0].abs_diff(level) <= step {
                filled[[ny as usize, nx as usize]] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    let region = filled
        .indexed_iter()
        .filter(|&(_, &inside)| inside)
        .map(|((y, x), _)| (x as u32, y as u32));

    mean_color(image, region)
}

fn mean_color(image: &RgbaImage, points: impl Iterator<Item = (u32, u32)>) -> BackgroundColor {
    let mut sums = [0.0f64; 3];
    let mut count = 0usize;

    for (x, y) in points {
        let pixel = image.get_pixel(x, y);
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += f64::from(channel);
        }
        count += 1;
    }

    let count = count.max(1) as f64;
    BackgroundColor {
        red: (sums[0] / count) as f32,
        green: (sums[1] / count) as f32,
        blue: (sums[2] / count) as f32,
    }
}
