use crate::foundation::math::{TAU, fract, glsl_mod, rotate2, step};
use crate::graph::op::CoordOp;

/// Map a sampling coordinate through a single-input coordinate transform.
pub(crate) fn transform(op: CoordOp, p: &[f32], st: (f32, f32), time: f32) -> (f32, f32) {
    match op {
        CoordOp::Rotate => {
            let (x, y) = rotate2(st.0 - 0.5, st.1 - 0.5, p[0] + p[1] * time);
            (x + 0.5, y + 0.5)
        }
        CoordOp::Scale => {
            let (ox, oy) = (p[3], p[4]);
            (
                (st.0 - ox) / (p[0] * p[1]) + ox,
                (st.1 - oy) / (p[0] * p[2]) + oy,
            )
        }
        CoordOp::Kaleid => kaleid(p[0], 0.0, st),
        CoordOp::Pixelate => pixelate(p[0], p[1], st),
        CoordOp::Repeat => {
            let mut x = st.0 * p[0];
            let mut y = st.1 * p[1];
            x += step(1.0, glsl_mod(y, 2.0)) * p[2];
            y += step(1.0, glsl_mod(x, 2.0)) * p[3];
            (fract(x), fract(y))
        }
        CoordOp::Scroll => (
            fract(st.0 + p[0] + time * p[2]),
            fract(st.1 + p[1] + time * p[3]),
        ),
    }
}

/// Polar fold around the center into a wedge of `2π / sides`; `radius_shift` is added to the
/// radius (used by `modulateKaleid`). The result is not re-centred.
pub(crate) fn kaleid(sides: f32, radius_shift: f32, st: (f32, f32)) -> (f32, f32) {
    let x = st.0 - 0.5;
    let y = st.1 - 0.5;
    let r = (x * x + y * y).sqrt() + radius_shift;
    let wedge = TAU / sides;
    let a = glsl_mod(y.atan2(x), wedge);
    let a = (a - wedge / 2.0).abs();
    (r * a.cos(), r * a.sin())
}

pub(crate) fn pixelate(px: f32, py: f32, st: (f32, f32)) -> (f32, f32) {
    (
        ((st.0 * px).floor() + 0.5) / px,
        ((st.1 * py).floor() + 0.5) / py,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    #[test]
    fn rotate_keeps_center_fixed() {
        let c = transform(CoordOp::Rotate, &[1.3, 0.2], (0.5, 0.5), 4.0);
        assert!(close(c, (0.5, 0.5)));
    }

    #[test]
    fn scale_zooms_around_offset() {
        let c = transform(CoordOp::Scale, &[2.0, 1.0, 1.0, 0.5, 0.5], (1.0, 0.0), 0.0);
        assert!(close(c, (0.75, 0.25)));
        let c = transform(CoordOp::Scale, &[1.0, 1.0, 1.5, 0.5, 0.5], (0.5, 0.8), 0.0);
        assert!(close(c, (0.5, 0.7)));
    }

    #[test]
    fn pixelate_snaps_to_cell_centers() {
        let c = transform(CoordOp::Pixelate, &[4.0, 2.0], (0.3, 0.9), 0.0);
        assert!(close(c, (0.375, 0.75)));
    }

    #[test]
    fn scroll_wraps() {
        let c = transform(CoordOp::Scroll, &[0.5, 0.5, 0.0, 0.0], (0.75, 0.25), 0.0);
        assert!(close(c, (0.25, 0.75)));
    }

    #[test]
    fn repeat_tiles() {
        let c = transform(CoordOp::Repeat, &[3.0, 3.0, 0.0, 0.0], (0.5, 0.1), 0.0);
        assert!(close(c, (0.5, 0.3)));
    }

    #[test]
    fn kaleid_folds_into_wedge() {
        let (x, y) = kaleid(4.0, 0.0, (0.9, 0.6));
        let r = (0.4f32 * 0.4 + 0.1 * 0.1).sqrt();
        assert!(((x * x + y * y).sqrt() - r).abs() < 1e-5);
        let a = y.atan2(x);
        assert!((0.0..=std::f32::consts::FRAC_PI_4 + 1e-5).contains(&a));
    }
}
