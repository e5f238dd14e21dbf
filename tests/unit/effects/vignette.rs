use image::Rgb;

use super::*;

#[test]
fn zero_strength_is_exact_noop() {
    let src = RgbImage::from_fn(40, 60, |x, y| Rgb([x as u8, y as u8, 99]));
    assert_eq!(apply_vignette(src.clone(), 0.0).unwrap(), src);
    assert_eq!(apply_vignette(src.clone(), -1.0).unwrap(), src);
    assert_eq!(apply_vignette(src.clone(), f32::NAN).unwrap(), src);
}

#[test]
fn mask_is_darker_at_edges_than_center() {
    let mask = vignette_mask(800, 1200, 1.0).unwrap();
    assert_eq!(mask.dimensions(), (800, 1200));
    let center = mask.get_pixel(400, 600)[0];
    let corner = mask.get_pixel(0, 0)[0];
    let edge = mask.get_pixel(0, 600)[0];
    assert!(corner > edge, "corner {corner} edge {edge}");
    assert!(edge > center, "edge {edge} center {center}");
}

#[test]
fn mask_scales_with_strength() {
    let weak = vignette_mask(400, 600, 0.25).unwrap();
    let strong = vignette_mask(400, 600, 1.0).unwrap();
    assert!(strong.get_pixel(0, 0)[0] > weak.get_pixel(0, 0)[0]);
}

#[test]
fn vignette_darkens_corners_of_flat_image() {
    let src = RgbImage::from_pixel(400, 600, Rgb([200, 200, 200]));
    let out = apply_vignette(src, 0.8).unwrap();
    assert!(out.get_pixel(0, 0)[0] < out.get_pixel(200, 300)[0]);
    assert!(out.get_pixel(200, 300)[0] <= 200);
}
