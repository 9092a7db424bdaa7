use crate::foundation::core::Rgba;
use crate::foundation::math::{fract, smoothstep};
use crate::graph::op::GeneratorOp;
use crate::ops::noise::simplex3;

const PI: f32 = 3.1416;

/// Evaluate a procedural generator at `st` (normalized, y up).
///
/// `p` holds the node's full parameter list, defaults already applied. `src` is sampled by the
/// executor and never reaches this function.
pub(crate) fn generate(op: GeneratorOp, p: &[f32], st: (f32, f32), time: f32) -> Rgba {
    match op {
        GeneratorOp::Osc => osc(p[0], p[1], p[2], st, time),
        GeneratorOp::Noise => {
            let n = simplex3([st.0 * p[0], st.1 * p[0], p[1] * time]);
            Rgba::gray(n)
        }
        GeneratorOp::Voronoi => voronoi(p[0], p[1], p[2], st, time),
        GeneratorOp::Shape => shape(p[0], p[1], p[2], st),
        GeneratorOp::Solid => Rgba::new(p[0], p[1], p[2], p[3]),
        GeneratorOp::Gradient => Rgba::new(st.0, st.1, (time * p[0]).sin(), 1.0),
        GeneratorOp::Src => Rgba::TRANSPARENT,
    }
}

fn osc(frequency: f32, sync: f32, offset: f32, st: (f32, f32), time: f32) -> Rgba {
    let phase = st.0 + time * sync;
    let shift = offset / frequency;
    let wave = |x: f32| (x * frequency).sin() * 0.5 + 0.5;
    Rgba::new(wave(phase - shift), wave(phase), wave(phase + shift), 1.0)
}

fn shape(sides: f32, radius: f32, smoothing: f32, st: (f32, f32)) -> Rgba {
    let x = st.0 * 2.0 - 1.0;
    let y = st.1 * 2.0 - 1.0;
    let a = x.atan2(y) + PI;
    let r = (2.0 * PI) / sides;
    let d = ((0.5 + a / r).floor() * r - a).cos() * (x * x + y * y).sqrt();
    Rgba::gray(1.0 - smoothstep(radius, radius + smoothing + 0.000_000_1, d))
}

fn voronoi(scale: f32, speed: f32, blending: f32, st: (f32, f32), time: f32) -> Rgba {
    let sx = st.0 * scale;
    let sy = st.1 * scale;
    let (ix, iy) = (sx.floor(), sy.floor());
    let (fx, fy) = (fract(sx), fract(sy));

    let mut m_dist = 10.0f32;
    let mut m_point = (0.0f32, 0.0f32);
    for j in -1..=1 {
        for i in -1..=1 {
            let (nx, ny) = (i as f32, j as f32);
            let (px, py) = (ix + nx, iy + ny);
            let hx = fract((px * 127.1 + py * 311.7).sin() * 43_758.545);
            let hy = fract((px * 269.5 + py * 183.3).sin() * 43_758.545);
            let ptx = 0.5 + 0.5 * (time * speed + 6.2831 * hx).sin();
            let pty = 0.5 + 0.5 * (time * speed + 6.2831 * hy).sin();
            let dx = nx + ptx - fx;
            let dy = ny + pty - fy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < m_dist {
                m_dist = dist;
                m_point = (ptx, pty);
            }
        }
    }
    let v = (m_point.0 * 0.3 + m_point.1 * 0.6) * (1.0 - blending * m_dist);
    Rgba::gray(v)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/generators.rs"]
mod tests;
