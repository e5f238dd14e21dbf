use image::{DynamicImage, Rgb, RgbImage};

use super::*;

#[test]
fn parses_long_short_and_bare_hex() {
    assert_eq!(Rgb8::from_hex("#ff0000"), Some(Rgb8::new(255, 0, 0)));
    assert_eq!(Rgb8::from_hex("00FF7f"), Some(Rgb8::new(0, 255, 127)));
    assert_eq!(Rgb8::from_hex("#fff"), Some(Rgb8::WHITE));
    assert_eq!(Rgb8::from_hex("  #102030 "), Some(Rgb8::new(16, 32, 48)));
}

#[test]
fn rejects_malformed_hex() {
    assert_eq!(Rgb8::from_hex(""), None);
    assert_eq!(Rgb8::from_hex("#12345"), None);
    assert_eq!(Rgb8::from_hex("#gg0000"), None);
    assert_eq!(Rgb8::from_hex("#ééé"), None);
}

#[test]
fn hex_formatting_is_uppercase_with_hash() {
    assert_eq!(Rgb8::new(1, 171, 255).to_hex(), "#01ABFF");
    assert_eq!(Rgb8::from_hex(&Rgb8::new(9, 8, 7).to_hex()), Some(Rgb8::new(9, 8, 7)));
}

#[test]
fn clamp_handles_nan() {
    assert_eq!(clamp_f32(f32::NAN, 0.0, 1.0), 0.0);
    assert_eq!(clamp_f32(2.0, 0.0, 1.0), 1.0);
    assert_eq!(clamp_f32(-2.0, -0.5, 0.5), -0.5);
}

#[test]
fn solid_tint_preserves_alpha_exactly() {
    let mut logo = RgbaImage::new(4, 1);
    for (i, px) in logo.pixels_mut().enumerate() {
        *px = Rgba([10 * i as u8, 200, 30, (i as u8) * 80]);
    }

    let tinted = solid_tint(&logo, Rgb8::new(1, 2, 3));
    for (a, b) in logo.pixels().zip(tinted.pixels()) {
        assert_eq!(a[3], b[3]);
        assert_eq!([b[0], b[1], b[2]], [1, 2, 3]);
    }
}

#[test]
fn average_color_of_flat_image_is_that_color() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(7, 5, Rgb([12, 200, 99])));
    assert_eq!(average_color(&img), Rgb8::new(12, 200, 99));
}

#[test]
fn average_color_mixes_halves() {
    let mut img = RgbImage::new(2, 1);
    img.put_pixel(0, 0, Rgb([0, 0, 0]));
    img.put_pixel(1, 0, Rgb([255, 100, 10]));
    let avg = average_color(&DynamicImage::ImageRgb8(img));
    assert_eq!(avg, Rgb8::new(128, 50, 5));
}
