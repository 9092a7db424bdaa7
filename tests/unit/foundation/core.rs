use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30000, 1001).unwrap();
    assert!((fps.as_f64() - 29.97).abs() < 0.01);
}

#[test]
fn ticks_to_secs_uses_rational_rate() {
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.ticks_to_secs(30) - 0.5).abs() < 1e-12);
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).unwrap_err().is_configuration());
    assert_eq!(Canvas::new(4, 3).unwrap().pixel_count(), 12);
}

#[test]
fn rgba8_quantization_clamps_and_rounds() {
    assert_eq!(Rgba::new(1.5, -0.2, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
    assert_eq!(Rgba::new(f32::NAN, 0.0, 0.0, 0.0).to_rgba8(), [0, 0, 0, 0]);
}
