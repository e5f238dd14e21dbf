use image::Rgb;

use super::*;
use crate::foundation::color::Rgb8;

fn red(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb([255, 0, 0]))
}

#[test]
fn radius_is_three_percent_of_short_side() {
    assert_eq!(corner_radius(2000, 3000), 60);
    assert_eq!(corner_radius(100, 50), 1);
}

#[test]
fn mask_is_clear_at_corners_and_solid_in_middle() {
    let m = rounded_rect_mask(200, 300, 0, 30.0).unwrap();
    assert_eq!(m.get_pixel(0, 0)[0], 0);
    assert_eq!(m.get_pixel(199, 299)[0], 0);
    assert_eq!(m.get_pixel(100, 150)[0], 255);
    assert_eq!(m.get_pixel(100, 0)[0], 255);
}

#[test]
fn oversized_inset_gives_empty_mask() {
    let m = rounded_rect_mask(40, 60, 20, 5.0).unwrap();
    assert!(m.pixels().all(|p| p[0] == 0));
}

#[test]
fn no_border_keeps_rgb_and_rounds_alpha() {
    let out = finish_corners_and_border(red(200, 300), &BorderOptions::default()).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 0]);
    assert_eq!(out.get_pixel(100, 150).0, [255, 0, 0, 255]);
}

#[test]
fn border_plate_fills_corners_and_ring() {
    let border = BorderOptions {
        enabled: true,
        width_px: 10,
        color: Rgb8::new(0, 0, 255),
    };
    let out = finish_corners_and_border(red(400, 600), &border).unwrap();
    assert!(out.pixels().all(|p| p[3] == 255));
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(200, 4).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(4, 300).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(200, 300).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(200, 20).0, [255, 0, 0, 255]);
}

#[test]
fn enabled_border_with_zero_width_only_fills_corners() {
    let border = BorderOptions {
        enabled: true,
        width_px: 0,
        color: Rgb8::WHITE,
    };
    let out = finish_corners_and_border(red(400, 600), &border).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(200, 0).0, [255, 0, 0, 255]);
}
