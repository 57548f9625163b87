mod common;

use common::synthetic_image::{fill_rect, noise, ruled_grid, INK_BLUE};
use gridcut::{
    decode_raw, BackgroundRemover, BackgroundSampling, GridBackgroundRemover, SegmentError, Stage,
    Tolerances,
};
use image::{Rgba, RgbaImage};

fn remover(tolerances: Tolerances) -> GridBackgroundRemover {
    GridBackgroundRemover::new(tolerances).unwrap()
}

/// 100x100 paper, 2px rules every 20px, 40x40 blue square in the middle
fn grid_with_square() -> RgbaImage {
    let mut image = ruled_grid(100, 100, 20, 2);
    fill_rect(&mut image, 30, 30, 70, 70, INK_BLUE);
    image
}

fn in_square(x: u32, y: u32) -> bool {
    (30..70).contains(&x) && (30..70).contains(&y)
}

#[test]
fn grid_scenario_keeps_square_and_clears_grid() {
    let image = grid_with_square();
    let output = GridBackgroundRemover::default()
        .remove_background(&image)
        .unwrap();

    assert_eq!(output.dimensions(), (100, 100));

    for (x, y, pixel) in output.enumerate_pixels() {
        if !in_square(x, y) {
            assert_eq!(pixel, &Rgba([0, 0, 0, 0]), "backdrop pixel ({x}, {y})");
            continue;
        }

        let [red, green, blue, alpha] = pixel.0;
        assert_eq!([red, green, blue], [30, 60, 200], "square RGB at ({x}, {y})");

        let on_edge = x == 30 || x == 69 || y == 30 || y == 69;
        let inset = (32..68).contains(&x) && (32..68).contains(&y);
        if on_edge {
            assert!(alpha > 0 && alpha < 255, "edge alpha {alpha} at ({x}, {y})");
        } else if inset {
            assert_eq!(alpha, 255, "interior alpha at ({x}, {y})");
        }
    }
}

#[test]
fn grid_scenario_with_flood_fill_sampling() {
    let image = grid_with_square();
    let output = remover(Tolerances {
        sampling: BackgroundSampling::FloodFill,
        ..Tolerances::default()
    })
    .remove_background(&image)
    .unwrap();

    assert_eq!(output.get_pixel(10, 10)[3], 0);
    assert_eq!(output.get_pixel(20, 50)[3], 0);
    assert_eq!(output.get_pixel(50, 50), &INK_BLUE);
}

#[test]
fn uniform_light_image_becomes_fully_transparent() {
    let colors = [
        Rgba([200, 200, 200, 255]),
        Rgba([250, 250, 250, 255]),
        Rgba([255, 255, 255, 255]),
        Rgba([235, 230, 228, 255]),
    ];
    for color in colors {
        let image = RgbaImage::from_pixel(16, 12, color);
        let output = GridBackgroundRemover::default()
            .remove_background(&image)
            .unwrap();

        assert!(output.pixels().all(|pixel| pixel[3] == 0), "{color:?}");
    }
}

#[test]
fn uniform_dark_or_colored_image_stays_opaque() {
    let colors = [
        // Below the brightness floor
        Rgba([100, 100, 100, 255]),
        Rgba([170, 170, 170, 255]),
        // Saturated, or light with a blue cast
        Rgba([200, 60, 40, 255]),
        Rgba([120, 130, 230, 255]),
        Rgba([200, 200, 230, 255]),
    ];
    for color in colors {
        let image = RgbaImage::from_pixel(16, 12, color);
        let output = GridBackgroundRemover::default()
            .remove_background(&image)
            .unwrap();

        assert_eq!(output, image, "{color:?}");
    }
}

#[test]
fn malformed_input_fails_without_output() {
    let cases = [
        decode_raw(4, 4, 3, vec![0; 47]),
        decode_raw(0, 4, 4, vec![]),
        decode_raw(4, 0, 4, vec![]),
        decode_raw(2, 2, 1, vec![0; 4]),
    ];
    for result in cases {
        assert!(matches!(result, Err(SegmentError::InvalidImageFormat { .. })));
    }

    let result = GridBackgroundRemover::default().remove_background(&RgbaImage::new(0, 0));
    assert!(matches!(result, Err(SegmentError::InvalidImageFormat { .. })));
}

#[test]
fn raw_rgb_buffer_runs_through_pipeline() {
    let mut data = Vec::new();
    for y in 0..8u32 {
        for x in 0..8u32 {
            if (2..6).contains(&x) && (2..6).contains(&y) {
                data.extend_from_slice(&[200, 40, 40]);
            } else {
                data.extend_from_slice(&[245, 245, 245]);
            }
        }
    }
    let image = decode_raw(8, 8, 3, data).unwrap();

    let output = remover(Tolerances {
        smooth_edges: false,
        ..Tolerances::default()
    })
    .remove_background(&image)
    .unwrap();

    assert_eq!(output.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    assert_eq!(output.get_pixel(3, 3), &Rgba([200, 40, 40, 255]));
}

#[test]
fn rgb_is_preserved_wherever_alpha_survives() {
    let presets = [
        Tolerances::default(),
        Tolerances::simple(),
        Tolerances {
            sampling: BackgroundSampling::FloodFill,
            ..Tolerances::default()
        },
    ];
    let sizes = [(1, 1), (1, 7), (13, 5), (40, 40)];

    for (seed, &(width, height)) in sizes.iter().enumerate() {
        let mut image = noise(width, height, seed as u32 + 7);
        if width > 4 && height > 4 {
            fill_rect(&mut image, 0, 0, width, 2, Rgba([250, 250, 250, 255]));
        }

        for tolerances in &presets {
            let output = remover(tolerances.clone()).remove_background(&image).unwrap();
            assert_eq!(output.dimensions(), image.dimensions());

            for (x, y, pixel) in output.enumerate_pixels() {
                let input = image.get_pixel(x, y);
                if pixel[3] == 0 {
                    assert_eq!(pixel, &Rgba([0, 0, 0, 0]));
                } else {
                    assert_eq!(pixel.0[..3], input.0[..3], "RGB changed at ({x}, {y})");
                    assert!(pixel[3] <= input[3], "alpha raised at ({x}, {y})");
                }
            }
        }
    }
}

#[test]
fn corner_color_is_cleared_and_nothing_else_changes() {
    let backdrop = Rgba([215, 215, 215, 255]);
    let image = RgbaImage::from_fn(24, 18, |x, y| {
        let border = x == 0 || y == 0 || x == 23 || y == 17;
        if border || (x + y) % 3 == 0 {
            backdrop
        } else {
            Rgba([
                ((x * 37 + y * 11) % 150) as u8,
                ((x * 13 + y * 29) % 150) as u8,
                ((x * 7 + y * 17) % 150) as u8,
                255,
            ])
        }
    });

    let output = remover(Tolerances {
        smooth_edges: false,
        ..Tolerances::default()
    })
    .remove_background(&image)
    .unwrap();

    for (x, y, pixel) in output.enumerate_pixels() {
        if image.get_pixel(x, y) == &backdrop {
            assert_eq!(pixel[3], 0, "backdrop at ({x}, {y})");
        } else {
            assert_eq!(pixel, image.get_pixel(x, y), "artwork at ({x}, {y})");
        }
    }
}

/// Paper with a saturated 10x10 blob
fn blob_on_paper() -> RgbaImage {
    let mut image = RgbaImage::from_pixel(30, 30, Rgba([235, 235, 235, 255]));
    fill_rect(&mut image, 10, 10, 20, 20, Rgba([200, 120, 90, 255]));
    image
}

#[test]
fn saturated_blob_survives_any_line_parameters() {
    let image = blob_on_paper();

    for line_brightness in [0.0, 100.0, 220.0] {
        for line_clear_brightness in [0.0, 100.0, 200.0] {
            for line_run_fraction in [0.0, 0.1, 0.6] {
                let tolerances = Tolerances {
                    line_brightness,
                    line_clear_brightness,
                    line_run_fraction,
                    smooth_edges: false,
                    ..Tolerances::default()
                };
                let output = remover(tolerances).remove_background(&image).unwrap();

                for y in 10..20 {
                    for x in 10..20 {
                        assert_eq!(
                            output.get_pixel(x, y),
                            &Rgba([200, 120, 90, 255]),
                            "blob at ({x}, {y}), line thresholds {line_brightness}/{line_clear_brightness}, \
                             fraction {line_run_fraction}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn restored_pixels_are_never_cleared_again() {
    let image = blob_on_paper();
    // Every visible pixel starts a run, so each blob row is treated as a line
    let tolerances = Tolerances {
        line_brightness: 0.0,
        line_clear_brightness: 0.0,
        line_run_fraction: 0.0,
        ..Tolerances::default()
    };

    let (output, trace) = remover(tolerances).remove_background_traced(&image).unwrap();

    let stages: Vec<Stage> = trace.stages.iter().map(|(stage, _)| *stage).collect();
    assert_eq!(
        stages,
        vec![
            Stage::ColorMask,
            Stage::LineSuppression,
            Stage::Protection,
            Stage::Smoothing
        ]
    );

    let suppressed = trace.mask_after(Stage::LineSuppression).unwrap();
    let protected = trace.mask_after(Stage::Protection).unwrap();
    let smoothed = trace.mask_after(Stage::Smoothing).unwrap();

    let mut restored = 0;
    for ((y, x), &before) in suppressed.indexed_iter() {
        if before != 0 || protected[[y, x]] == 0 {
            continue;
        }
        restored += 1;
        assert!(smoothed[[y, x]] > 0, "re-zeroed at ({x}, {y})");
        assert!(output.get_pixel(x as u32, y as u32)[3] > 0);
    }

    assert_eq!(restored, 100);
}

#[test]
fn passes_only_narrow_or_restore() {
    let image = grid_with_square();
    let (_, trace) = GridBackgroundRemover::default()
        .remove_background_traced(&image)
        .unwrap();

    let color = trace.mask_after(Stage::ColorMask).unwrap();
    let lines = trace.mask_after(Stage::LineSuppression).unwrap();
    let protected = trace.mask_after(Stage::Protection).unwrap();

    for ((y, x), &value) in lines.indexed_iter() {
        assert!(value <= color[[y, x]], "line pass raised ({x}, {y})");
        assert!(protected[[y, x]] >= value, "protection lowered ({x}, {y})");
    }
}

#[test]
fn one_remover_serves_many_threads() {
    let remover = GridBackgroundRemover::default();
    let image = grid_with_square();
    let expected = remover.remove_background(&image).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| remover.remove_background(&image).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
