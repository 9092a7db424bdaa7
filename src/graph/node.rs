use std::fmt;

use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::graph::args::IntoArgs;
use crate::graph::op::{
    ColorOp, CombineOp, CoordOp, GeneratorOp, ModulateOp, OpKind, ParamKind, TransformOp,
};
use crate::graph::patch::{Graph, PRIMARY};
use crate::param::slot::{BufferRef, ParamSlot};

/// One operator application.
///
/// Nodes are immutable values: every combinator returns a new node that owns a copy of its
/// receiver. Parameter lists may be shorter than the operator's table; trailing defaults are
/// filled in by the compiler.
#[derive(Clone, Debug)]
pub enum Node {
    /// Operator with no texture input.
    Generator {
        /// Operator.
        op: GeneratorOp,
        /// Positional arguments.
        params: Vec<ParamSlot>,
    },
    /// Operator over one or more input nodes; `inputs[0]` is the receiver.
    Transform {
        /// Operator.
        op: TransformOp,
        /// Positional arguments.
        params: Vec<ParamSlot>,
        /// Receiver followed by any additional inputs.
        inputs: Vec<Node>,
    },
}

impl Node {
    /// Build a node from a looked-up operator. Generators reject inputs here; transform arity is
    /// checked by [`Node::validate`].
    pub fn new(op: OpKind, params: Vec<ParamSlot>, inputs: Vec<Node>) -> LoopwaveResult<Self> {
        match op {
            OpKind::Generator(op) => {
                if !inputs.is_empty() {
                    return Err(LoopwaveError::configuration(format!(
                        "generator '{}' takes no inputs, got {}",
                        OpKind::Generator(op),
                        inputs.len()
                    )));
                }
                Ok(Self::Generator { op, params })
            }
            OpKind::Transform(op) => Ok(Self::Transform { op, params, inputs }),
        }
    }

    fn transform(&self, op: TransformOp, inputs: Vec<Node>, args: impl IntoArgs) -> Self {
        let mut all = Vec::with_capacity(inputs.len() + 1);
        all.push(self.clone());
        all.extend(inputs);
        Self::Transform {
            op,
            params: args.into_args(),
            inputs: all,
        }
    }

    /// Operator of this node.
    pub fn op(&self) -> OpKind {
        match self {
            Self::Generator { op, .. } => OpKind::Generator(*op),
            Self::Transform { op, .. } => OpKind::Transform(*op),
        }
    }

    /// Positional arguments as supplied.
    pub fn params(&self) -> &[ParamSlot] {
        match self {
            Self::Generator { params, .. } | Self::Transform { params, .. } => params,
        }
    }

    /// Input nodes; empty for generators.
    pub fn inputs(&self) -> &[Node] {
        match self {
            Self::Generator { .. } => &[],
            Self::Transform { inputs, .. } => inputs,
        }
    }

    /// Check operator arity and argument slots for this node and everything below it.
    pub fn validate(&self) -> LoopwaveResult<()> {
        let op = self.op();
        let specs = op.params();
        let params = self.params();

        if self.inputs().len() != op.input_arity() {
            return Err(LoopwaveError::configuration(format!(
                "arity mismatch: '{op}' takes {} input(s), got {}",
                op.input_arity(),
                self.inputs().len()
            )));
        }
        if params.len() > specs.len() {
            return Err(LoopwaveError::configuration(format!(
                "'{op}' takes at most {} argument(s), got {}",
                specs.len(),
                params.len()
            )));
        }
        if params.len() < op.required_params() {
            let missing: Vec<_> = specs[params.len()..op.required_params()]
                .iter()
                .map(|p| p.name)
                .collect();
            return Err(LoopwaveError::configuration(format!(
                "'{op}' is missing required argument(s): {}",
                missing.join(", ")
            )));
        }
        for (slot, spec) in params.iter().zip(specs) {
            let ok = match (spec.kind, slot) {
                (ParamKind::Number, ParamSlot::Constant(v)) => v.is_finite(),
                (ParamKind::Number, ParamSlot::Time(_)) => true,
                (ParamKind::Buffer, ParamSlot::Buffer(b)) => {
                    !b.name.is_empty() && b.strength.is_finite()
                }
                _ => false,
            };
            if !ok {
                return Err(LoopwaveError::configuration(format!(
                    "malformed argument '{}' of '{op}': {slot:?}",
                    spec.name
                )));
            }
        }

        self.inputs().iter().try_for_each(Node::validate)
    }

    /// Every buffer this tree reads, in canonical order.
    pub fn buffer_refs(&self) -> Vec<&BufferRef> {
        crate::graph::walk::preorder(self)
            .into_iter()
            .flat_map(|n| n.params())
            .filter_map(|p| match p {
                ParamSlot::Buffer(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Bind this tree to `buffer`.
    pub fn out(&self, buffer: impl Into<String>) -> Graph {
        Graph::new(buffer, self.clone())
    }

    /// Bind this tree to the primary output.
    pub fn out_primary(&self) -> Graph {
        self.out(PRIMARY)
    }
}

macro_rules! single_input {
    ($($(#[$doc:meta])* $method:ident => $op:expr;)*) => {
        impl Node {
            $(
                $(#[$doc])*
                pub fn $method(&self, args: impl IntoArgs) -> Node {
                    self.transform($op, Vec::new(), args)
                }
            )*
        }
    };
}

macro_rules! two_input {
    ($($(#[$doc:meta])* $method:ident => $op:expr;)*) => {
        impl Node {
            $(
                $(#[$doc])*
                pub fn $method(&self, other: impl Into<Node>, args: impl IntoArgs) -> Node {
                    self.transform($op, vec![other.into()], args)
                }
            )*
        }
    };
}

single_input! {
    /// `rotate(angle, speed)`
    rotate => TransformOp::Coord(CoordOp::Rotate);
    /// `scale(amount, xMult, yMult, offsetX, offsetY)`
    scale => TransformOp::Coord(CoordOp::Scale);
    /// `kaleid(nSides)`
    kaleid => TransformOp::Coord(CoordOp::Kaleid);
    /// `pixelate(pixelX, pixelY)`
    pixelate => TransformOp::Coord(CoordOp::Pixelate);
    /// `repeat(repeatX, repeatY, offsetX, offsetY)`
    repeat => TransformOp::Coord(CoordOp::Repeat);
    /// `scroll(scrollX, scrollY, speedX, speedY)`
    scroll => TransformOp::Coord(CoordOp::Scroll);
    /// `brightness(amount)`
    brightness => TransformOp::Color(ColorOp::Brightness);
    /// `contrast(amount)`
    contrast => TransformOp::Color(ColorOp::Contrast);
    /// `invert(amount)`
    invert => TransformOp::Color(ColorOp::Invert);
    /// `saturate(amount)`
    saturate => TransformOp::Color(ColorOp::Saturate);
    /// `color(r, g, b, a)`
    color => TransformOp::Color(ColorOp::Color);
    /// `luma(threshold, tolerance)`
    luma => TransformOp::Color(ColorOp::Luma);
    /// `thresh(threshold, tolerance)`
    thresh => TransformOp::Color(ColorOp::Thresh);
    /// `posterize(bins, gamma)`
    posterize => TransformOp::Color(ColorOp::Posterize);
}

two_input! {
    /// `add(texture, amount)`
    add => TransformOp::Combine(CombineOp::Add);
    /// `sub(texture, amount)`
    sub => TransformOp::Combine(CombineOp::Sub);
    /// `mult(texture, amount)`
    mult => TransformOp::Combine(CombineOp::Mult);
    /// `blend(texture, amount)`
    blend => TransformOp::Combine(CombineOp::Blend);
    /// `diff(texture)`
    diff => TransformOp::Combine(CombineOp::Diff);
    /// `layer(texture)`
    layer => TransformOp::Combine(CombineOp::Layer);
    /// `mask(texture)`
    mask => TransformOp::Combine(CombineOp::Mask);
    /// `modulate(texture, amount)`
    modulate => TransformOp::Modulate(ModulateOp::Modulate);
    /// `modulateScale(texture, multiple, offset)`
    modulate_scale => TransformOp::Modulate(ModulateOp::ModulateScale);
    /// `modulateRotate(texture, multiple, offset)`
    modulate_rotate => TransformOp::Modulate(ModulateOp::ModulateRotate);
    /// `modulateKaleid(texture, nSides)`
    modulate_kaleid => TransformOp::Modulate(ModulateOp::ModulateKaleid);
    /// `modulatePixelate(texture, multiple, offset)`
    modulate_pixelate => TransformOp::Modulate(ModulateOp::ModulatePixelate);
}

fn generator(op: GeneratorOp, args: impl IntoArgs) -> Node {
    Node::Generator {
        op,
        params: args.into_args(),
    }
}

/// `osc(frequency, sync, offset)`
pub fn osc(args: impl IntoArgs) -> Node {
    generator(GeneratorOp::Osc, args)
}

/// `noise(scale, offset)`
pub fn noise(args: impl IntoArgs) -> Node {
    generator(GeneratorOp::Noise, args)
}

/// `voronoi(scale, speed, blending)`
pub fn voronoi(args: impl IntoArgs) -> Node {
    generator(GeneratorOp::Voronoi, args)
}

/// `shape(sides, radius, smoothing)`
pub fn shape(args: impl IntoArgs) -> Node {
    generator(GeneratorOp::Shape, args)
}

/// `solid(r, g, b, a)`; `r`, `g` and `b` are required.
pub fn solid(args: impl IntoArgs) -> Node {
    generator(GeneratorOp::Solid, args)
}

/// `gradient(speed)`
pub fn gradient(args: impl IntoArgs) -> Node {
    generator(GeneratorOp::Gradient, args)
}

/// `src(buffer)`: previous-frame contents of a buffer.
pub fn src(buffer: impl Into<BufferRef>) -> Node {
    generator(GeneratorOp::Src, ParamSlot::Buffer(buffer.into()))
}

impl From<&str> for Node {
    fn from(name: &str) -> Self {
        src(name)
    }
}

impl From<BufferRef> for Node {
    fn from(b: BufferRef) -> Self {
        src(b)
    }
}

impl From<&Node> for Node {
    fn from(n: &Node) -> Self {
        n.clone()
    }
}

/// Chain notation, e.g. `osc(23, -0.05, 1000).kaleid(50)`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn args(f: &mut fmt::Formatter<'_>, extra: &[Node], params: &[ParamSlot]) -> fmt::Result {
            let mut first = true;
            let mut sep = |f: &mut fmt::Formatter<'_>| {
                if !std::mem::take(&mut first) {
                    f.write_str(", ")?;
                }
                Ok::<_, fmt::Error>(())
            };
            for n in extra {
                sep(f)?;
                write!(f, "{n}")?;
            }
            for p in params {
                sep(f)?;
                match p {
                    ParamSlot::Constant(v) => write!(f, "{v}")?,
                    ParamSlot::Time(_) => f.write_str("() => ..")?,
                    ParamSlot::Buffer(b) if b.strength == 1.0 => f.write_str(&b.name)?,
                    ParamSlot::Buffer(b) => write!(f, "{}*{}", b.name, b.strength)?,
                }
            }
            Ok(())
        }

        match self {
            Self::Generator { params, .. } => {
                write!(f, "{}(", self.op())?;
                args(f, &[], params)?;
                f.write_str(")")
            }
            Self::Transform { params, inputs, .. } => {
                let (receiver, extra) = match inputs.split_first() {
                    Some((r, rest)) => (Some(r), rest),
                    None => (None, &[][..]),
                };
                if let Some(r) = receiver {
                    write!(f, "{r}.")?;
                }
                write!(f, "{}(", self.op())?;
                args(f, extra, params)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/node.rs"]
mod tests;
