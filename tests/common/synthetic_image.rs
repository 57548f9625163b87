use image::{Rgba, RgbaImage};

pub const PAPER: Rgba<u8> = Rgba([250, 250, 250, 255]);
pub const RULE: Rgba<u8> = Rgba([230, 230, 230, 255]);
pub const INK_BLUE: Rgba<u8> = Rgba([30, 60, 200, 255]);

/// Ruled grid on paper: `thickness`-pixel rules every `spacing` pixels,
/// starting at the top-left corner.
pub fn ruled_grid(width: u32, height: u32, spacing: u32, thickness: u32) -> RgbaImage {
    assert!(spacing > thickness, "rules must leave paper between them");

    RgbaImage::from_fn(width, height, |x, y| {
        if x % spacing < thickness || y % spacing < thickness {
            RULE
        } else {
            PAPER
        }
    })
}

/// Paints a solid rectangle `[x0, x1) x [y0, y1)`.
pub fn fill_rect(image: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}

/// Deterministic noise image (xorshift), alpha included.
pub fn noise(width: u32, height: u32, seed: u32) -> RgbaImage {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    RgbaImage::from_fn(width, height, |_, _| {
        let bits = next();
        let alpha = if bits & 0x8000_0000 != 0 { 255 } else { (bits >> 24) as u8 };
        Rgba([bits as u8, (bits >> 8) as u8, (bits >> 16) as u8, alpha])
    })
}
