use crate::foundation::core::Rgba;
use crate::foundation::math::{luminance, mix, smoothstep, step};
use crate::graph::op::ColorOp;

const SATURATE_WEIGHTS: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// Apply a single-input color transform.
pub(crate) fn apply(op: ColorOp, p: &[f32], c: Rgba) -> Rgba {
    match op {
        ColorOp::Brightness => Rgba::new(c.r + p[0], c.g + p[0], c.b + p[0], c.a),
        ColorOp::Contrast => {
            let k = |v: f32| (v - 0.5) * p[0] + 0.5;
            Rgba::new(k(c.r), k(c.g), k(c.b), c.a)
        }
        ColorOp::Invert => {
            let k = |v: f32| (1.0 - v) * p[0] + v * (1.0 - p[0]);
            Rgba::new(k(c.r), k(c.g), k(c.b), c.a)
        }
        ColorOp::Saturate => {
            let [wr, wg, wb] = SATURATE_WEIGHTS;
            let intensity = c.r * wr + c.g * wg + c.b * wb;
            let k = |v: f32| mix(intensity, v, p[0]);
            Rgba::new(k(c.r), k(c.g), k(c.b), c.a)
        }
        ColorOp::Color => {
            let tint = Rgba::new(p[0], p[1], p[2], p[3]);
            c.zip(tint, |v, t| mix((1.0 - v) * t.abs(), t * v, step(0.0, t)))
        }
        ColorOp::Luma => {
            let a = luma_key(p[0], p[1], c);
            Rgba::new(c.r * a, c.g * a, c.b * a, a)
        }
        ColorOp::Thresh => {
            let v = luma_key(p[0], p[1], c);
            Rgba::new(v, v, v, c.a)
        }
        ColorOp::Posterize => {
            let (bins, gamma) = (p[0], p[1]);
            let k = |v: f32| {
                let q = (v.powf(gamma) * bins).floor() / bins;
                q.powf(1.0 / gamma)
            };
            Rgba::new(k(c.r), k(c.g), k(c.b), c.a)
        }
    }
}

fn luma_key(threshold: f32, tolerance: f32, c: Rgba) -> f32 {
    let tol = tolerance + 0.000_000_1;
    smoothstep(threshold - tol, threshold + tol, luminance(c.r, c.g, c.b))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/colors.rs"]
mod tests;
