//! Closed operator catalogue: names, parameter lists, defaults and input arity.

use crate::foundation::error::{LoopwaveError, LoopwaveResult};

/// Version of the operator table. Bumped whenever a formula, default or parameter list changes.
pub const OPERATOR_LIBRARY_VERSION: u32 = 1;

/// Operators with no texture input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorOp {
    /// Sine oscillator.
    Osc,
    /// 3D simplex noise sliced by time.
    Noise,
    /// Animated cellular pattern.
    Voronoi,
    /// Regular polygon.
    Shape,
    /// Uniform color.
    Solid,
    /// Coordinate gradient.
    Gradient,
    /// Previous-frame contents of a named buffer.
    Src,
}

/// Single-input transforms of the sampling coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordOp {
    /// Rotation around the center.
    Rotate,
    /// Zoom around an offset point.
    Scale,
    /// Polar fold.
    Kaleid,
    /// Coordinate quantization.
    Pixelate,
    /// Tiling.
    Repeat,
    /// Translation.
    Scroll,
}

/// Single-input transforms of the color value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorOp {
    /// Additive brightness.
    Brightness,
    /// Contrast around mid gray.
    Contrast,
    /// Blend towards the negative.
    Invert,
    /// Saturation around luminance.
    Saturate,
    /// Per-channel multiplier.
    Color,
    /// Luma key.
    Luma,
    /// Luma threshold.
    Thresh,
    /// Level quantization.
    Posterize,
}

/// Two-input color combiners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombineOp {
    /// Weighted sum.
    Add,
    /// Weighted difference.
    Sub,
    /// Weighted product.
    Mult,
    /// Linear blend.
    Blend,
    /// Absolute difference.
    Diff,
    /// Alpha-over.
    Layer,
    /// Luminance mask.
    Mask,
}

/// Two-input combiners where the second input displaces the receiver's coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModulateOp {
    /// Coordinate offset.
    Modulate,
    /// Coordinate zoom.
    ModulateScale,
    /// Coordinate rotation.
    ModulateRotate,
    /// Polar fold with a modulated radius.
    ModulateKaleid,
    /// Coordinate quantization.
    ModulatePixelate,
}

/// Operator applied by a transform node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformOp {
    /// See [`CoordOp`].
    Coord(CoordOp),
    /// See [`ColorOp`].
    Color(ColorOp),
    /// See [`CombineOp`].
    Combine(CombineOp),
    /// See [`ModulateOp`].
    Modulate(ModulateOp),
}

/// Any operator in the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// See [`GeneratorOp`].
    Generator(GeneratorOp),
    /// See [`TransformOp`].
    Transform(TransformOp),
}

/// What a parameter position accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Constant or time function.
    Number,
    /// Buffer reference.
    Buffer,
}

/// One parameter position of an operator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    /// Parameter name as it appears in the synth's documentation.
    pub name: &'static str,
    /// Value used when the argument is omitted; `None` marks a required parameter.
    pub default: Option<f64>,
    /// Accepted slot kind.
    pub kind: ParamKind,
}

impl ParamSpec {
    const fn num(name: &'static str, default: f64) -> Self {
        Self {
            name,
            default: Some(default),
            kind: ParamKind::Number,
        }
    }

    const fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            kind: ParamKind::Number,
        }
    }

    const fn buffer(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            kind: ParamKind::Buffer,
        }
    }

    /// Value substituted when evaluation fails. Required parameters fall back to zero.
    pub fn fallback(&self) -> f64 {
        self.default.unwrap_or(0.0)
    }
}

/// Every operator, in library order. The position is the operator's stable code.
pub const ALL_OPS: [OpKind; 33] = {
    use ColorOp as C;
    use CombineOp as B;
    use CoordOp as X;
    use GeneratorOp as G;
    use ModulateOp as M;
    use TransformOp as T;
    [
        OpKind::Generator(G::Osc),
        OpKind::Generator(G::Noise),
        OpKind::Generator(G::Voronoi),
        OpKind::Generator(G::Shape),
        OpKind::Generator(G::Solid),
        OpKind::Generator(G::Gradient),
        OpKind::Generator(G::Src),
        OpKind::Transform(T::Coord(X::Rotate)),
        OpKind::Transform(T::Coord(X::Scale)),
        OpKind::Transform(T::Coord(X::Kaleid)),
        OpKind::Transform(T::Coord(X::Pixelate)),
        OpKind::Transform(T::Coord(X::Repeat)),
        OpKind::Transform(T::Coord(X::Scroll)),
        OpKind::Transform(T::Color(C::Brightness)),
        OpKind::Transform(T::Color(C::Contrast)),
        OpKind::Transform(T::Color(C::Invert)),
        OpKind::Transform(T::Color(C::Saturate)),
        OpKind::Transform(T::Color(C::Color)),
        OpKind::Transform(T::Color(C::Luma)),
        OpKind::Transform(T::Color(C::Thresh)),
        OpKind::Transform(T::Color(C::Posterize)),
        OpKind::Transform(T::Combine(B::Add)),
        OpKind::Transform(T::Combine(B::Sub)),
        OpKind::Transform(T::Combine(B::Mult)),
        OpKind::Transform(T::Combine(B::Blend)),
        OpKind::Transform(T::Combine(B::Diff)),
        OpKind::Transform(T::Combine(B::Layer)),
        OpKind::Transform(T::Combine(B::Mask)),
        OpKind::Transform(T::Modulate(M::Modulate)),
        OpKind::Transform(T::Modulate(M::ModulateScale)),
        OpKind::Transform(T::Modulate(M::ModulateRotate)),
        OpKind::Transform(T::Modulate(M::ModulateKaleid)),
        OpKind::Transform(T::Modulate(M::ModulatePixelate)),
    ]
};

impl OpKind {
    /// Look an operator up by its camelCase name.
    pub fn from_name(name: &str) -> LoopwaveResult<Self> {
        ALL_OPS
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .ok_or_else(|| LoopwaveError::configuration(format!("unknown operator '{name}'")))
    }

    /// Stable numeric code, used in kernel signatures.
    pub fn code(self) -> u8 {
        // ALL_OPS is exhaustive, so the lookup always succeeds.
        ALL_OPS.iter().position(|&op| op == self).unwrap_or(usize::MAX) as u8
    }

    /// camelCase name.
    pub fn name(self) -> &'static str {
        use ColorOp as C;
        use CombineOp as B;
        use CoordOp as X;
        use GeneratorOp as G;
        use ModulateOp as M;
        match self {
            Self::Generator(g) => match g {
                G::Osc => "osc",
                G::Noise => "noise",
                G::Voronoi => "voronoi",
                G::Shape => "shape",
                G::Solid => "solid",
                G::Gradient => "gradient",
                G::Src => "src",
            },
            Self::Transform(TransformOp::Coord(x)) => match x {
                X::Rotate => "rotate",
                X::Scale => "scale",
                X::Kaleid => "kaleid",
                X::Pixelate => "pixelate",
                X::Repeat => "repeat",
                X::Scroll => "scroll",
            },
            Self::Transform(TransformOp::Color(c)) => match c {
                C::Brightness => "brightness",
                C::Contrast => "contrast",
                C::Invert => "invert",
                C::Saturate => "saturate",
                C::Color => "color",
                C::Luma => "luma",
                C::Thresh => "thresh",
                C::Posterize => "posterize",
            },
            Self::Transform(TransformOp::Combine(b)) => match b {
                B::Add => "add",
                B::Sub => "sub",
                B::Mult => "mult",
                B::Blend => "blend",
                B::Diff => "diff",
                B::Layer => "layer",
                B::Mask => "mask",
            },
            Self::Transform(TransformOp::Modulate(m)) => match m {
                M::Modulate => "modulate",
                M::ModulateScale => "modulateScale",
                M::ModulateRotate => "modulateRotate",
                M::ModulateKaleid => "modulateKaleid",
                M::ModulatePixelate => "modulatePixelate",
            },
        }
    }

    /// Parameter list in positional order.
    pub fn params(self) -> &'static [ParamSpec] {
        use ColorOp as C;
        use CombineOp as B;
        use CoordOp as X;
        use GeneratorOp as G;
        use ModulateOp as M;
        match self {
            Self::Generator(g) => match g {
                G::Osc => table::OSC,
                G::Noise => table::NOISE,
                G::Voronoi => table::VORONOI,
                G::Shape => table::SHAPE,
                G::Solid => table::SOLID,
                G::Gradient => table::GRADIENT,
                G::Src => table::SRC,
            },
            Self::Transform(TransformOp::Coord(x)) => match x {
                X::Rotate => table::ROTATE,
                X::Scale => table::SCALE,
                X::Kaleid => table::N_SIDES,
                X::Pixelate => table::PIXELATE,
                X::Repeat => table::REPEAT,
                X::Scroll => table::SCROLL,
            },
            Self::Transform(TransformOp::Color(c)) => match c {
                C::Brightness => table::BRIGHTNESS,
                C::Contrast => table::CONTRAST,
                C::Invert => table::UNIT_AMOUNT,
                C::Saturate => table::SATURATE,
                C::Color => table::COLOR,
                C::Luma => table::LUMA,
                C::Thresh => table::THRESH,
                C::Posterize => table::POSTERIZE,
            },
            Self::Transform(TransformOp::Combine(b)) => match b {
                B::Add | B::Sub | B::Mult => table::UNIT_AMOUNT,
                B::Blend => table::BLEND,
                B::Diff | B::Layer | B::Mask => table::NONE,
            },
            Self::Transform(TransformOp::Modulate(m)) => match m {
                M::Modulate => table::MODULATE,
                M::ModulateScale => table::MODULATE_SCALE,
                M::ModulateRotate => table::MODULATE_ROTATE,
                M::ModulateKaleid => table::N_SIDES,
                M::ModulatePixelate => table::MODULATE_PIXELATE,
            },
        }
    }

    /// Number of node inputs, the receiver included.
    pub fn input_arity(self) -> usize {
        match self {
            Self::Generator(_) => 0,
            Self::Transform(TransformOp::Coord(_) | TransformOp::Color(_)) => 1,
            Self::Transform(TransformOp::Combine(_) | TransformOp::Modulate(_)) => 2,
        }
    }

    /// Number of leading parameters that must be supplied.
    pub fn required_params(self) -> usize {
        self.params()
            .iter()
            .take_while(|p| p.default.is_none())
            .count()
    }
}

mod table {
    use super::ParamSpec as P;

    pub(super) const NONE: &[P] = &[];
    pub(super) const UNIT_AMOUNT: &[P] = &[P::num("amount", 1.0)];

    pub(super) const OSC: &[P] = &[
        P::num("frequency", 60.0),
        P::num("sync", 0.1),
        P::num("offset", 0.0),
    ];
    pub(super) const NOISE: &[P] = &[P::num("scale", 10.0), P::num("offset", 0.1)];
    pub(super) const VORONOI: &[P] = &[
        P::num("scale", 5.0),
        P::num("speed", 0.3),
        P::num("blending", 0.3),
    ];
    pub(super) const SHAPE: &[P] = &[
        P::num("sides", 3.0),
        P::num("radius", 0.3),
        P::num("smoothing", 0.01),
    ];
    pub(super) const SOLID: &[P] = &[
        P::required("r"),
        P::required("g"),
        P::required("b"),
        P::num("a", 1.0),
    ];
    pub(super) const GRADIENT: &[P] = &[P::num("speed", 0.0)];
    pub(super) const SRC: &[P] = &[P::buffer("buffer")];

    pub(super) const ROTATE: &[P] = &[P::num("angle", 10.0), P::num("speed", 0.0)];
    pub(super) const SCALE: &[P] = &[
        P::num("amount", 1.5),
        P::num("xMult", 1.0),
        P::num("yMult", 1.0),
        P::num("offsetX", 0.5),
        P::num("offsetY", 0.5),
    ];
    pub(super) const N_SIDES: &[P] = &[P::num("nSides", 4.0)];
    pub(super) const PIXELATE: &[P] = &[P::num("pixelX", 20.0), P::num("pixelY", 20.0)];
    pub(super) const REPEAT: &[P] = &[
        P::num("repeatX", 3.0),
        P::num("repeatY", 3.0),
        P::num("offsetX", 0.0),
        P::num("offsetY", 0.0),
    ];
    pub(super) const SCROLL: &[P] = &[
        P::num("scrollX", 0.5),
        P::num("scrollY", 0.5),
        P::num("speedX", 0.0),
        P::num("speedY", 0.0),
    ];

    pub(super) const BRIGHTNESS: &[P] = &[P::num("amount", 0.4)];
    pub(super) const CONTRAST: &[P] = &[P::num("amount", 1.6)];
    pub(super) const SATURATE: &[P] = &[P::num("amount", 2.0)];
    pub(super) const COLOR: &[P] = &[
        P::num("r", 1.0),
        P::num("g", 1.0),
        P::num("b", 1.0),
        P::num("a", 1.0),
    ];
    pub(super) const LUMA: &[P] = &[P::num("threshold", 0.5), P::num("tolerance", 0.1)];
    pub(super) const THRESH: &[P] = &[P::num("threshold", 0.5), P::num("tolerance", 0.04)];
    pub(super) const POSTERIZE: &[P] = &[P::num("bins", 3.0), P::num("gamma", 0.6)];

    pub(super) const BLEND: &[P] = &[P::num("amount", 0.5)];

    pub(super) const MODULATE: &[P] = &[P::num("amount", 0.1)];
    pub(super) const MODULATE_SCALE: &[P] = &[P::num("multiple", 1.0), P::num("offset", 1.0)];
    pub(super) const MODULATE_ROTATE: &[P] = &[P::num("multiple", 1.0), P::num("offset", 0.0)];
    pub(super) const MODULATE_PIXELATE: &[P] = &[P::num("multiple", 10.0), P::num("offset", 3.0)];
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/op.rs"]
mod tests;
