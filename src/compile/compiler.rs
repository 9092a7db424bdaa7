use crate::compile::kernel::{CompiledKernel, Instr, Reg};
use crate::compile::signature::signature_of;
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::graph::node::Node;
use crate::graph::op::{GeneratorOp, OpKind, ParamKind, TransformOp};
use crate::graph::walk::preorder;

#[derive(Clone, Copy)]
struct SlotBase {
    params: u32,
    texture: u32,
}

struct Lowering {
    bases: Vec<SlotBase>,
    instrs: Vec<Instr>,
    coord_regs: usize,
    color_regs: usize,
}

fn subtree_len(node: &Node) -> usize {
    1 + node.inputs().iter().map(subtree_len).sum::<usize>()
}

impl Lowering {
    fn new(root: &Node) -> Self {
        let mut bases = Vec::new();
        let mut params = 0u32;
        let mut texture = 0u32;
        for n in preorder(root) {
            bases.push(SlotBase { params, texture });
            for spec in n.op().params() {
                match spec.kind {
                    ParamKind::Number => params += 1,
                    ParamKind::Buffer => texture += 1,
                }
            }
        }
        Self {
            bases,
            instrs: Vec::new(),
            coord_regs: 1,
            color_regs: 0,
        }
    }

    fn alloc(count: &mut usize) -> LoopwaveResult<Reg> {
        let r = Reg::try_from(*count)
            .map_err(|_| LoopwaveError::configuration("graph too large to compile"))?;
        *count += 1;
        Ok(r)
    }

    /// Lower the subtree at preorder index `idx`, sampled at coordinate register `coord`.
    /// Returns the color register holding the subtree's value.
    fn lower(&mut self, node: &Node, idx: usize, coord: Reg) -> LoopwaveResult<Reg> {
        let base = self.bases[idx];
        match node {
            Node::Generator {
                op: GeneratorOp::Src,
                ..
            } => {
                let dst = Self::alloc(&mut self.color_regs)?;
                self.instrs.push(Instr::Sample {
                    texture: base.texture,
                    coord,
                    dst,
                });
                Ok(dst)
            }
            Node::Generator { op, .. } => {
                let dst = Self::alloc(&mut self.color_regs)?;
                self.instrs.push(Instr::Gen {
                    op: *op,
                    params: base.params,
                    coord,
                    dst,
                });
                Ok(dst)
            }
            Node::Transform { op, inputs, .. } => {
                let (receiver, other) = (&inputs[0], inputs.get(1));
                let receiver_idx = idx + 1;
                let other_idx = receiver_idx + subtree_len(receiver);
                match *op {
                    TransformOp::Coord(op) => {
                        let dst = Self::alloc(&mut self.coord_regs)?;
                        self.instrs.push(Instr::Coord {
                            op,
                            params: base.params,
                            src: coord,
                            dst,
                        });
                        self.lower(receiver, receiver_idx, dst)
                    }
                    TransformOp::Color(op) => {
                        let reg = self.lower(receiver, receiver_idx, coord)?;
                        self.instrs.push(Instr::Color {
                            op,
                            params: base.params,
                            reg,
                        });
                        Ok(reg)
                    }
                    TransformOp::Combine(op) => {
                        let acc = self.lower(receiver, receiver_idx, coord)?;
                        let other = self.lower(required(other, node)?, other_idx, coord)?;
                        self.instrs.push(Instr::Combine {
                            op,
                            params: base.params,
                            acc,
                            other,
                        });
                        Ok(acc)
                    }
                    TransformOp::Modulate(op) => {
                        let by = self.lower(required(other, node)?, other_idx, coord)?;
                        let dst = Self::alloc(&mut self.coord_regs)?;
                        self.instrs.push(Instr::ModCoord {
                            op,
                            params: base.params,
                            coord,
                            by,
                            dst,
                        });
                        self.lower(receiver, receiver_idx, dst)
                    }
                }
            }
        }
    }
}

fn required<'a>(input: Option<&'a Node>, node: &Node) -> LoopwaveResult<&'a Node> {
    input.ok_or_else(|| {
        LoopwaveError::configuration(format!("arity mismatch: '{}' is missing an input", node.op()))
    })
}

/// Lower a node tree into a [`CompiledKernel`].
///
/// Deterministic and free of hidden state: the same tree shape always produces the same
/// instruction stream. Unknown operators cannot reach this point (the catalogue is closed);
/// arity and argument errors are reported as configuration errors.
#[tracing::instrument(skip(root), fields(op = %root.op()))]
pub fn compile_kernel(root: &Node) -> LoopwaveResult<CompiledKernel> {
    root.validate()?;

    let mut lowering = Lowering::new(root);
    let output = lowering.lower(root, 0, 0)?;

    let (param_count, texture_count) = preorder(root)
        .iter()
        .flat_map(|n| n.op().params())
        .fold((0, 0), |(p, t), spec| match spec.kind {
            ParamKind::Number => (p + 1, t),
            ParamKind::Buffer => (p, t + 1),
        });

    let kernel = CompiledKernel {
        signature: signature_of(root),
        instrs: lowering.instrs,
        coord_regs: lowering.coord_regs,
        color_regs: lowering.color_regs,
        param_count,
        texture_count,
        output,
    };
    tracing::debug!(
        signature = %kernel.signature,
        instrs = kernel.instrs.len(),
        "compiled kernel"
    );
    Ok(kernel)
}

/// Render the instruction stream of `kernel` as one line per instruction, for `inspect`.
pub fn disassemble(kernel: &CompiledKernel) -> Vec<String> {
    kernel
        .instrs
        .iter()
        .map(|ins| match *ins {
            Instr::Gen {
                op,
                params,
                coord,
                dst,
            } => format!("k{dst} = {}(c{coord}) @p{params}", OpKind::Generator(op)),
            Instr::Sample {
                texture,
                coord,
                dst,
            } => format!("k{dst} = src(t{texture}, c{coord})"),
            Instr::Coord {
                op,
                params,
                src,
                dst,
            } => format!(
                "c{dst} = {}(c{src}) @p{params}",
                OpKind::Transform(TransformOp::Coord(op))
            ),
            Instr::Color { op, params, reg } => format!(
                "k{reg} = {}(k{reg}) @p{params}",
                OpKind::Transform(TransformOp::Color(op))
            ),
            Instr::Combine {
                op,
                params,
                acc,
                other,
            } => format!(
                "k{acc} = {}(k{acc}, k{other}) @p{params}",
                OpKind::Transform(TransformOp::Combine(op))
            ),
            Instr::ModCoord {
                op,
                params,
                coord,
                by,
                dst,
            } => format!(
                "c{dst} = {}(c{coord}, k{by}) @p{params}",
                OpKind::Transform(TransformOp::Modulate(op))
            ),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
