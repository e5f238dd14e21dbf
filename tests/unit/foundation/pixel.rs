use image::Rgb;

use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn premultiply_roundtrip_is_stable_for_opaque_and_clear() {
    let mut px = vec![10, 20, 30, 255, 90, 80, 70, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn unpremultiply_half_alpha_restores_color() {
    let mut px = vec![64, 0, 128, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 0, 255, 128]);
}

#[test]
fn composite_onto_rgb_clips_offscreen_layer() {
    let mut canvas = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
    let mut layer = PremulLayer::transparent(-1, 2, 3, 4);
    for px in layer.data.chunks_exact_mut(4) {
        px.copy_from_slice(&[255, 255, 255, 255]);
    }

    composite_onto_rgb(&mut canvas, &layer);

    assert_eq!(canvas.get_pixel(0, 2), &Rgb([255, 255, 255]));
    assert_eq!(canvas.get_pixel(1, 3), &Rgb([255, 255, 255]));
    assert_eq!(canvas.get_pixel(2, 2), &Rgb([0, 0, 0]));
    assert_eq!(canvas.get_pixel(0, 1), &Rgb([0, 0, 0]));
}

#[test]
fn composite_onto_rgb_blends_half_alpha() {
    let mut canvas = RgbImage::from_pixel(1, 1, Rgb([0, 0, 200]));
    let mut layer = PremulLayer::transparent(0, 0, 1, 1);
    layer.data.copy_from_slice(&[128, 0, 0, 128]);

    composite_onto_rgb(&mut canvas, &layer);

    let px = canvas.get_pixel(0, 0);
    assert_eq!(px[0], 128);
    assert_eq!(px[1], 0);
    assert!((px[2] as i32 - 99).abs() <= 1);
}

#[test]
fn draw_over_respects_layer_origins() {
    let mut dst = PremulLayer::transparent(10, 10, 2, 2);
    let mut src = PremulLayer::transparent(11, 11, 2, 2);
    src.data.fill(255);

    dst.draw_over(&src);

    assert_eq!(&dst.data[0..4], &[0, 0, 0, 0]);
    assert_eq!(&dst.data[12..16], &[255, 255, 255, 255]);
}

#[test]
fn blend_toward_masked_rejects_wrong_mask_len() {
    let mut img = RgbImage::new(2, 2);
    assert!(blend_toward_masked(&mut img, Rgb8::BLACK, &[0u8; 3]).is_err());
}

#[test]
fn blend_toward_masked_full_mask_replaces() {
    let mut img = RgbImage::from_pixel(2, 1, Rgb([100, 150, 200]));
    blend_toward_masked(&mut img, Rgb8::BLACK, &[255, 0]).unwrap();
    assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
    assert_eq!(img.get_pixel(1, 0), &Rgb([100, 150, 200]));
}
