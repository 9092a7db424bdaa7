use super::*;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn osc_channels_are_phase_shifted() {
    let c = generate(GeneratorOp::Osc, &[10.0, 0.0, 0.0], (0.3, 0.5), 0.0);
    assert!(close(c.r, c.g) && close(c.g, c.b));
    assert!(close(c.g, (3.0f32).sin() * 0.5 + 0.5));
    assert_eq!(c.a, 1.0);

    let c = generate(GeneratorOp::Osc, &[10.0, 0.0, 1.0], (0.3, 0.5), 0.0);
    assert!(close(c.r, (2.0f32).sin() * 0.5 + 0.5));
    assert!(close(c.b, (4.0f32).sin() * 0.5 + 0.5));
}

#[test]
fn osc_scrolls_with_sync() {
    let a = generate(GeneratorOp::Osc, &[10.0, 0.1, 0.0], (0.0, 0.0), 1.0);
    let b = generate(GeneratorOp::Osc, &[10.0, 0.1, 0.0], (0.1, 0.0), 0.0);
    assert!(close(a.g, b.g));
}

#[test]
fn shape_is_filled_at_center_and_empty_at_corner() {
    let p = [4.0, 0.5, 0.0];
    assert_eq!(generate(GeneratorOp::Shape, &p, (0.5, 0.5), 0.0), Rgba::gray(1.0));
    assert_eq!(generate(GeneratorOp::Shape, &p, (0.02, 0.98), 0.0), Rgba::gray(0.0));
}

#[test]
fn shape_smoothing_produces_soft_edge() {
    let p = [50.0, 0.4, 0.2];
    let c = generate(GeneratorOp::Shape, &p, (0.75, 0.5), 0.0);
    assert!(c.r > 0.0 && c.r < 1.0);
}

#[test]
fn solid_and_gradient() {
    let c = generate(GeneratorOp::Solid, &[1.0, 0.5, 0.25, 1.0], (0.1, 0.9), 3.0);
    assert_eq!(c, Rgba::new(1.0, 0.5, 0.25, 1.0));
    let g = generate(GeneratorOp::Gradient, &[0.0], (0.25, 0.75), 3.0);
    assert_eq!(g, Rgba::new(0.25, 0.75, 0.0, 1.0));
}

#[test]
fn voronoi_is_bounded_and_animated() {
    let p = [5.0, 0.3, 0.3];
    let a = generate(GeneratorOp::Voronoi, &p, (0.37, 0.61), 0.0);
    let b = generate(GeneratorOp::Voronoi, &p, (0.37, 0.61), 2.0);
    assert!((0.0..=0.9).contains(&a.r));
    assert_ne!(a, b);
}

#[test]
fn noise_is_gray_and_opaque() {
    let c = generate(GeneratorOp::Noise, &[5.0, 0.1], (0.4, 0.2), 1.0);
    assert!(close(c.r, c.g) && close(c.g, c.b));
    assert_eq!(c.a, 1.0);
}
