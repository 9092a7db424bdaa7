use crate::foundation::core::Rgba;
use crate::foundation::math::rotate2;
use crate::graph::op::ModulateOp;
use crate::ops::coords::{kaleid, pixelate};

/// Displace the receiver's sampling coordinate `st` by the modulator color `c`.
pub(crate) fn displace(op: ModulateOp, p: &[f32], st: (f32, f32), c: Rgba) -> (f32, f32) {
    match op {
        ModulateOp::Modulate => (st.0 + c.r * p[0], st.1 + c.g * p[0]),
        ModulateOp::ModulateScale => {
            let (multiple, offset) = (p[0], p[1]);
            (
                (st.0 - 0.5) / (offset + multiple * c.r) + 0.5,
                (st.1 - 0.5) / (offset + multiple * c.g) + 0.5,
            )
        }
        ModulateOp::ModulateRotate => {
            let (multiple, offset) = (p[0], p[1]);
            let (x, y) = rotate2(st.0 - 0.5, st.1 - 0.5, offset + c.r * multiple);
            (x + 0.5, y + 0.5)
        }
        ModulateOp::ModulateKaleid => kaleid(p[0], c.r, st),
        ModulateOp::ModulatePixelate => {
            let (multiple, offset) = (p[0], p[1]);
            pixelate(offset + c.r * multiple, offset + c.g * multiple, st)
        }
    }
}
