use smallvec::SmallVec;

use crate::compile::signature::Signature;
use crate::foundation::core::Rgba;
use crate::graph::op::{ColorOp, CombineOp, CoordOp, GeneratorOp, ModulateOp};
use crate::ops::{colors, combine, coords, generators, modulate};
use crate::param::resolver::TextureBinding;

/// Register index into the per-pixel coordinate or color file.
pub(crate) type Reg = u16;

/// One step of a lowered node tree.
///
/// `params` is the base offset of the node's parameters in the resolved value array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Instr {
    Gen {
        op: GeneratorOp,
        params: u32,
        coord: Reg,
        dst: Reg,
    },
    Sample {
        texture: u32,
        coord: Reg,
        dst: Reg,
    },
    Coord {
        op: CoordOp,
        params: u32,
        src: Reg,
        dst: Reg,
    },
    Color {
        op: ColorOp,
        params: u32,
        reg: Reg,
    },
    Combine {
        op: CombineOp,
        params: u32,
        acc: Reg,
        other: Reg,
    },
    ModCoord {
        op: ModulateOp,
        params: u32,
        coord: Reg,
        by: Reg,
        dst: Reg,
    },
}

/// Per-pixel register files; sized once per row and reused.
pub(crate) struct Registers {
    coords: SmallVec<[(f32, f32); 8]>,
    colors: SmallVec<[Rgba; 8]>,
}

/// Executable form of a node tree shape.
///
/// Holds no parameter values: every evaluation is fed a [`ResolvedParams`] laid out by the same
/// canonical walk that produced the instruction stream.
///
/// [`ResolvedParams`]: crate::ResolvedParams
#[derive(Debug)]
pub struct CompiledKernel {
    pub(crate) signature: Signature,
    pub(crate) instrs: Vec<Instr>,
    pub(crate) coord_regs: usize,
    pub(crate) color_regs: usize,
    pub(crate) param_count: usize,
    pub(crate) texture_count: usize,
    pub(crate) output: Reg,
}

impl CompiledKernel {
    /// Structural signature this kernel was compiled for.
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Number of instructions executed per pixel.
    pub fn instruction_count(&self) -> usize {
        self.instrs.len()
    }

    /// Length of the numeric parameter array this kernel expects.
    pub fn param_count(&self) -> usize {
        self.param_count
    }

    /// Number of texture bindings this kernel expects.
    pub fn texture_count(&self) -> usize {
        self.texture_count
    }

    pub(crate) fn registers(&self) -> Registers {
        Registers {
            coords: SmallVec::from_elem((0.0, 0.0), self.coord_regs),
            colors: SmallVec::from_elem(Rgba::TRANSPARENT, self.color_regs),
        }
    }

    /// Evaluate one pixel at `st`. Slices must match `param_count` and `texture_count`.
    pub(crate) fn eval(
        &self,
        regs: &mut Registers,
        st: (f32, f32),
        time: f32,
        values: &[f32],
        textures: &[TextureBinding],
    ) -> Rgba {
        let c = &mut regs.coords;
        let k = &mut regs.colors;
        c[0] = st;

        for ins in &self.instrs {
            match *ins {
                Instr::Gen {
                    op,
                    params,
                    coord,
                    dst,
                } => {
                    let p = &values[params as usize..];
                    k[dst as usize] = generators::generate(op, p, c[coord as usize], time);
                }
                Instr::Sample {
                    texture,
                    coord,
                    dst,
                } => {
                    let t = &textures[texture as usize];
                    let (u, v) = c[coord as usize];
                    let s = t.strength;
                    k[dst as usize] = t.surface.sample(u, v).map(|ch| ch * s);
                }
                Instr::Coord {
                    op,
                    params,
                    src,
                    dst,
                } => {
                    let p = &values[params as usize..];
                    c[dst as usize] = coords::transform(op, p, c[src as usize], time);
                }
                Instr::Color { op, params, reg } => {
                    let p = &values[params as usize..];
                    k[reg as usize] = colors::apply(op, p, k[reg as usize]);
                }
                Instr::Combine {
                    op,
                    params,
                    acc,
                    other,
                } => {
                    let p = &values[params as usize..];
                    k[acc as usize] = combine::apply(op, p, k[acc as usize], k[other as usize]);
                }
                Instr::ModCoord {
                    op,
                    params,
                    coord,
                    by,
                    dst,
                } => {
                    let p = &values[params as usize..];
                    c[dst as usize] = modulate::displace(op, p, c[coord as usize], k[by as usize]);
                }
            }
        }

        k[self.output as usize]
    }
}
