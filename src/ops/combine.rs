use crate::foundation::core::Rgba;
use crate::foundation::math::{luminance, mix};
use crate::graph::op::CombineOp;

/// Combine the receiver color `c0` with the other input `c1`.
pub(crate) fn apply(op: CombineOp, p: &[f32], c0: Rgba, c1: Rgba) -> Rgba {
    match op {
        CombineOp::Add => {
            let amt = p[0];
            c0.zip(c1, |a, b| (a + b) * amt + a * (1.0 - amt))
        }
        CombineOp::Sub => {
            let amt = p[0];
            c0.zip(c1, |a, b| (a - b) * amt + a * (1.0 - amt))
        }
        CombineOp::Mult => {
            let amt = p[0];
            c0.zip(c1, |a, b| a * (1.0 - amt) + a * b * amt)
        }
        CombineOp::Blend => {
            let amt = p[0];
            c0.zip(c1, |a, b| a * (1.0 - amt) + b * amt)
        }
        CombineOp::Diff => Rgba::new(
            (c0.r - c1.r).abs(),
            (c0.g - c1.g).abs(),
            (c0.b - c1.b).abs(),
            c0.a.max(c1.a),
        ),
        CombineOp::Layer => Rgba::new(
            mix(c0.r, c1.r, c1.a),
            mix(c0.g, c1.g, c1.a),
            mix(c0.b, c1.b, c1.a),
            (c0.a + c1.a).clamp(0.0, 1.0),
        ),
        CombineOp::Mask => {
            let a = luminance(c1.r, c1.g, c1.b);
            Rgba::new(c0.r * a, c0.g * a, c0.b * a, c0.a * a)
        }
    }
}
