//! GLSL-flavoured scalar helpers shared by the operator library.

pub(crate) const TAU: f32 = std::f32::consts::TAU;

/// GLSL `mod`: result has the sign of `y`.
pub(crate) fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}

pub(crate) fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

pub(crate) fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

pub(crate) fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Rec. 601 luma, as used by `luma`, `thresh` and `mask`.
pub(crate) fn luminance(r: f32, g: f32, b: f32) -> f32 {
    r * 0.299 + g * 0.587 + b * 0.114
}

/// Rotate `(x, y)` around the origin the way `mat2(c,-s,s,c) * xy` does.
pub(crate) fn rotate2(x: f32, y: f32, angle: f32) -> (f32, f32) {
    let (s, c) = angle.sin_cos();
    (c * x + s * y, -s * x + c * y)
}
