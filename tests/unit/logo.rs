use image::{Rgb, Rgba};

use super::*;

fn bg(c: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 12, Rgb(c)))
}

fn logo_with_alpha_ramp(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| Rgba([200, 100, 50, ((x + y) * 13 % 256) as u8]))
}

#[test]
fn match_mode_uses_background_average_and_keeps_alpha() {
    let logo = logo_with_alpha_ramp(10, 6);
    let out = recolor_logo(&logo, LogoMode::Match, Rgb8::WHITE, &bg([10, 20, 30])).unwrap();
    for (a, b) in logo.pixels().zip(out.pixels()) {
        assert_eq!(a[3], b[3]);
        assert_eq!([b[0], b[1], b[2]], [10, 20, 30]);
    }
}

#[test]
fn hex_mode_uses_configured_color() {
    let logo = logo_with_alpha_ramp(3, 3);
    let out = recolor_logo(&logo, LogoMode::Hex, Rgb8::new(1, 2, 3), &bg([0, 0, 0])).unwrap();
    assert!(out.pixels().all(|p| [p[0], p[1], p[2]] == [1, 2, 3]));
}

#[test]
fn stock_keeps_logo_and_none_suppresses() {
    let logo = logo_with_alpha_ramp(3, 3);
    assert_eq!(
        recolor_logo(&logo, LogoMode::Stock, Rgb8::WHITE, &bg([0, 0, 0])).unwrap(),
        logo
    );
    assert!(recolor_logo(&logo, LogoMode::None, Rgb8::WHITE, &bg([0, 0, 0])).is_none());
}

#[test]
fn proportional_width_and_vertical_center() {
    let p = proportional_placement(400, 100, 2000, 3000, 0.5, 0.75).unwrap();
    assert_eq!(p.width, 1000);
    assert_eq!(p.height, 250);
    assert_eq!(p.x, 500);
    assert_eq!(p.y + i64::from(p.height) / 2, 2250);
}

#[test]
fn box_fit_shrinks_large_logo_into_box() {
    let opts = LogoOptions::default();
    for (w, h) in [(1200, 300), (900, 900), (5000, 100), (100, 5000)] {
        let p = bounding_box_placement(w, h, 2000, 3000, &opts).unwrap();
        assert!(p.width <= opts.box_max_w, "{w}x{h} -> {p:?}");
        assert!(p.height <= opts.box_max_h, "{w}x{h} -> {p:?}");
    }
}

#[test]
fn box_fit_never_upscales_small_logo() {
    let opts = LogoOptions::default();
    let p = bounding_box_placement(120, 40, 2000, 3000, &opts).unwrap();
    assert_eq!((p.width, p.height), (120, 40));
    assert_eq!(p.x + 60, 1000);
    assert_eq!(p.y + 20, (3000.0f32 * 0.78) as i64);
}

#[test]
fn box_override_replaces_scale_and_offset() {
    let opts = LogoOptions {
        override_enabled: true,
        override_scale: Some(2.0),
        override_offset_y: Some(0.1),
        ..LogoOptions::default()
    };
    let p = bounding_box_placement(100, 50, 2000, 3000, &opts).unwrap();
    assert_eq!((p.width, p.height), (200, 100));
    assert_eq!(p.y + 50, 300);
}

#[test]
fn override_flag_off_ignores_override_values() {
    let opts = LogoOptions {
        override_enabled: false,
        override_scale: Some(2.0),
        ..LogoOptions::default()
    };
    let p = bounding_box_placement(100, 50, 2000, 3000, &opts).unwrap();
    assert_eq!((p.width, p.height), (100, 50));
}

#[test]
fn absent_logo_returns_canvas_unmodified() {
    let canvas = RgbImage::from_pixel(20, 30, Rgb([9, 9, 9]));
    let out = place_logo(
        canvas.clone(),
        None,
        &bg([0, 0, 0]),
        Template::Default,
        &LogoOptions::default(),
    );
    assert_eq!(out, canvas);
}

#[test]
fn transparent_pixels_do_not_paint() {
    let canvas = RgbImage::from_pixel(20, 30, Rgb([9, 9, 9]));
    let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 0])));
    let out = place_logo(
        canvas.clone(),
        Some(&logo),
        &bg([0, 0, 0]),
        Template::Default,
        &LogoOptions::default(),
    );
    assert_eq!(out, canvas);
}

#[test]
fn opaque_logo_paints_at_anchor() {
    let canvas = RgbImage::from_pixel(200, 300, Rgb([0, 0, 0]));
    let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(50, 10, Rgba([255, 255, 255, 255])));
    let out = place_logo(
        canvas,
        Some(&logo),
        &bg([0, 0, 0]),
        Template::Default,
        &LogoOptions::default(),
    );
    // 100x20 logo centred at (100, 225).
    assert_eq!(out.get_pixel(100, 225), &Rgb([255, 255, 255]));
    assert_eq!(out.get_pixel(100, 200), &Rgb([0, 0, 0]));
    assert_eq!(out.get_pixel(20, 225), &Rgb([0, 0, 0]));
}
