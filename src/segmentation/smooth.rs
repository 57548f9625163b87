use super::types::Mask;

/// 5x5 smoothing weights, summing to 100
const KERNEL: [[u32; 5]; 5] = [
    [1, 1, 1, 1, 1],
    [1, 5, 5, 5, 1],
    [1, 5, 44, 5, 1],
    [1, 5, 5, 5, 1],
    [1, 1, 1, 1, 1],
];
const KERNEL_SUM: u32 = 100;

/// Lowest value smoothing can give a fully opaque cell: its own center weight
pub const RESTORED_FLOOR: u8 = ((44 * 255 + KERNEL_SUM / 2) / KERNEL_SUM) as u8;

/// Soften the mask boundary into a short gradient
///
/// Each cell becomes the smaller of its value and the filtered value, so
/// alpha only grades down into the artwork: backdrop stays at 0 and an
/// opaque cell never drops below [`RESTORED_FLOOR`]. Cells below
/// `min_confidence` are then dropped. Edges replicate the border.
pub fn smooth_mask(mask: &Mask, min_confidence: u8) -> Mask {
    let _span = tracing::debug_span!("smoothing").entered();

    let (height, width) = mask.dim();
    if height == 0 || width == 0 {
        return mask.clone();
    }

    Mask::from_shape_fn((height, width), |(y, x)| {
        let mut total = 0u32;
        for (ky, weights) in KERNEL.iter().enumerate() {
            let sy = (y + ky).saturating_sub(2).min(height - 1);
            for (kx, weight) in weights.iter().enumerate() {
                let sx = (x + kx).saturating_sub(2).min(width - 1);
                total += weight * u32::from(mask[[sy, sx]]);
            }
        }

        let filtered = ((total + KERNEL_SUM / 2) / KERNEL_SUM) as u8;
        let value = mask[[y, x]].min(filtered);
        if value < min_confidence {
            0
        } else {
            value
        }
    })
}
