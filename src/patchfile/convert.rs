use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::graph::node::Node;
use crate::graph::op::{OpKind, ParamKind};
use crate::graph::patch::{Graph, PRIMARY, Patch};
use crate::param::slot::{BufferRef, ParamSlot};
use crate::patchfile::model::{ArgDef, CallDef, PatchDef};

pub(crate) fn to_patch(def: &PatchDef) -> LoopwaveResult<Patch> {
    let canvas = Canvas::new(def.canvas.width, def.canvas.height)?;
    let mut b = Patch::builder(canvas);
    if let Some(fps) = def.fps {
        b = b.fps(Fps::new(fps.num, fps.den)?);
    }
    if let Some(declared) = &def.buffers {
        b = b.buffers(declared.iter().cloned());
    }
    if let Some(render) = &def.render {
        b = b.render(render.clone());
    }
    for (i, out) in def.outputs.iter().enumerate() {
        let target = out.buffer.as_deref().unwrap_or(PRIMARY);
        let root = chain_to_node(&out.chain).map_err(|e| match e {
            LoopwaveError::Configuration(msg) => {
                LoopwaveError::configuration(format!("outputs[{i}]: {msg}"))
            }
            other => other,
        })?;
        b = b.graph(Graph::new(target, root));
    }
    b.build()
}

fn chain_to_node(chain: &[CallDef]) -> LoopwaveResult<Node> {
    let Some((head, rest)) = chain.split_first() else {
        return Err(LoopwaveError::configuration("empty call chain"));
    };
    let head_op = OpKind::from_name(&head.op)?;
    if !matches!(head_op, OpKind::Generator(_)) {
        return Err(LoopwaveError::configuration(format!(
            "chain must start with a generator, got '{head_op}'"
        )));
    }
    let mut node = Node::new(head_op, params(head_op, &head.args)?, Vec::new())?;

    for call in rest {
        let op = OpKind::from_name(&call.op)?;
        node = match op.input_arity() {
            0 => {
                return Err(LoopwaveError::configuration(format!(
                    "generator '{op}' cannot be chained"
                )));
            }
            1 => Node::new(op, params(op, &call.args)?, vec![node])?,
            _ => {
                let (other, args) = call.args.split_first().ok_or_else(|| {
                    LoopwaveError::configuration(format!(
                        "arity mismatch: '{op}' needs a second input"
                    ))
                })?;
                Node::new(op, params(op, args)?, vec![node, input(op, other)?])?
            }
        };
    }
    Ok(node)
}

fn input(op: OpKind, arg: &ArgDef) -> LoopwaveResult<Node> {
    match arg {
        ArgDef::Chain { chain } => chain_to_node(chain),
        ArgDef::Text(name) if !name.starts_with('=') => Ok(Node::from(name.as_str())),
        ArgDef::Buffer { buffer, strength } => Ok(Node::from(buffer_ref(buffer, *strength))),
        other => Err(LoopwaveError::configuration(format!(
            "malformed argument 'input' of '{op}': expected a chain or buffer, got {other:?}"
        ))),
    }
}

fn buffer_ref(name: &str, strength: Option<f64>) -> BufferRef {
    let b = BufferRef::new(name);
    match strength {
        Some(s) => b.with_strength(s),
        None => b,
    }
}

fn params(op: OpKind, args: &[ArgDef]) -> LoopwaveResult<Vec<ParamSlot>> {
    let specs = op.params();
    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            // Extra arguments are kept so validation can report them.
            let kind = specs.get(i).map_or(ParamKind::Number, |s| s.kind);
            let name = specs.get(i).map_or("?", |s| s.name);
            match (kind, arg) {
                (ParamKind::Number, ArgDef::Number(v)) => Ok(ParamSlot::Constant(*v)),
                (ParamKind::Number, ArgDef::Text(src)) if src.starts_with('=') => {
                    ParamSlot::expr(src)
                }
                (ParamKind::Buffer, ArgDef::Text(name)) if !name.starts_with('=') => {
                    Ok(ParamSlot::Buffer(BufferRef::new(name.as_str())))
                }
                (ParamKind::Buffer, ArgDef::Buffer { buffer, strength }) => {
                    Ok(ParamSlot::Buffer(buffer_ref(buffer, *strength)))
                }
                (_, other) => Err(LoopwaveError::configuration(format!(
                    "malformed argument '{name}' of '{op}': {other:?}"
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/patchfile/convert.rs"]
mod tests;
