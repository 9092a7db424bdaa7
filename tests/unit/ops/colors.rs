use super::*;

fn close(a: Rgba, b: Rgba) -> bool {
    [(a.r, b.r), (a.g, b.g), (a.b, b.b), (a.a, b.a)]
        .iter()
        .all(|(x, y)| (x - y).abs() < 1e-5)
}

#[test]
fn brightness_is_additive_and_keeps_alpha() {
    let c = apply(ColorOp::Brightness, &[0.3], Rgba::new(0.1, 0.2, 0.3, 0.5));
    assert!(close(c, Rgba::new(0.4, 0.5, 0.6, 0.5)));
}

#[test]
fn contrast_pivots_on_mid_gray() {
    let c = apply(ColorOp::Contrast, &[2.0], Rgba::new(0.5, 0.75, 0.25, 1.0));
    assert!(close(c, Rgba::new(0.5, 1.0, 0.0, 1.0)));
}

#[test]
fn invert_full_and_partial() {
    let c = Rgba::new(0.2, 0.6, 1.0, 1.0);
    assert!(close(apply(ColorOp::Invert, &[1.0], c), Rgba::new(0.8, 0.4, 0.0, 1.0)));
    assert!(close(apply(ColorOp::Invert, &[0.5], c), Rgba::new(0.5, 0.5, 0.5, 1.0)));
}

#[test]
fn saturate_zero_is_grayscale() {
    let c = apply(ColorOp::Saturate, &[0.0], Rgba::new(1.0, 0.0, 0.0, 1.0));
    assert!(close(c, Rgba::new(0.2125, 0.2125, 0.2125, 1.0)));
    let same = apply(ColorOp::Saturate, &[1.0], Rgba::new(0.3, 0.6, 0.9, 1.0));
    assert!(close(same, Rgba::new(0.3, 0.6, 0.9, 1.0)));
}

#[test]
fn color_multiplies_positive_and_inverts_negative() {
    let c = apply(
        ColorOp::Color,
        &[0.5, -1.0, 1.0, 1.0],
        Rgba::new(0.8, 0.25, 0.4, 1.0),
    );
    assert!(close(c, Rgba::new(0.4, 0.75, 0.4, 1.0)));
}

#[test]
fn thresh_is_binary_with_small_tolerance() {
    let bright = apply(ColorOp::Thresh, &[0.5, 0.04], Rgba::gray(0.9));
    let dark = apply(ColorOp::Thresh, &[0.5, 0.04], Rgba::gray(0.1));
    assert!(close(bright, Rgba::gray(1.0)));
    assert!(close(dark, Rgba::gray(0.0)));
}

#[test]
fn luma_keys_alpha() {
    let c = apply(ColorOp::Luma, &[0.5, 0.1], Rgba::gray(0.2));
    assert!(close(c, Rgba::TRANSPARENT));
}

#[test]
fn posterize_quantizes() {
    let c = apply(ColorOp::Posterize, &[4.0, 1.0], Rgba::new(0.3, 0.6, 0.99, 1.0));
    assert!(close(c, Rgba::new(0.25, 0.5, 0.75, 1.0)));
}
