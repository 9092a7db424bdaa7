use std::sync::Arc;

use crate::foundation::core::TickIndex;
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::graph::node::Node;
use crate::graph::op::{OpKind, ParamKind, ParamSpec};
use crate::graph::walk::preorder;
use crate::param::slot::{ParamSlot, TimeFn, TimeFnError};
use crate::render::buffers::BufferRegistry;
use crate::render::surface::Surface;

/// A buffer's front side bound for one evaluation.
#[derive(Clone, Debug)]
pub struct TextureBinding {
    /// Buffer name.
    pub buffer: String,
    /// Previous-frame contents.
    pub surface: Arc<Surface>,
    /// Gain applied to sampled colors.
    pub strength: f32,
}

/// Value produced for one parameter slot.
#[derive(Clone, Debug)]
pub enum Resolved {
    /// Numeric parameter.
    Number(f64),
    /// Buffer reference.
    Texture(TextureBinding),
}

/// All values a compiled kernel needs for one evaluation, in canonical slot order.
#[derive(Clone, Debug, Default)]
pub struct ResolvedParams {
    /// Numeric parameters, defaults filled to full operator arity.
    pub values: Vec<f32>,
    /// Texture slots.
    pub textures: Vec<TextureBinding>,
    /// Number of parameters replaced by their default after a failed evaluation.
    pub substitutions: usize,
}

/// Evaluates parameter slots at a single shared instant.
#[derive(Clone, Copy, Debug)]
pub struct Resolver {
    time: f64,
    tick: TickIndex,
}

impl Resolver {
    /// Resolver for `tick`, observing `time`.
    pub fn new(time: f64, tick: TickIndex) -> Self {
        Self { time, tick }
    }

    /// The instant every slot observes.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Resolve one slot. `None` means the argument was omitted.
    ///
    /// Time functions are invoked exactly once per call. A failure or non-finite result is
    /// logged and replaced by the parameter's default; the flag in the result reports it.
    pub fn resolve_slot(
        &self,
        op: OpKind,
        spec: &ParamSpec,
        slot: Option<&ParamSlot>,
        buffers: &BufferRegistry,
    ) -> LoopwaveResult<(Resolved, bool)> {
        match (spec.kind, slot) {
            (ParamKind::Number, None) => Ok((Resolved::Number(spec.fallback()), false)),
            (ParamKind::Number, Some(ParamSlot::Constant(v))) => Ok((Resolved::Number(*v), false)),
            (ParamKind::Number, Some(ParamSlot::Time(f))) => {
                let outcome = call_time_fn(f, self.time).and_then(|v| {
                    if v.is_finite() {
                        Ok(v)
                    } else {
                        Err(TimeFnError::new(format!("non-finite result {v}")))
                    }
                });
                match outcome {
                    Ok(v) => Ok((Resolved::Number(v), false)),
                    Err(e) => {
                        tracing::warn!(
                            op = op.name(),
                            param = spec.name,
                            tick = self.tick.0,
                            time = self.time,
                            error = %e,
                            "time function failed, substituting default"
                        );
                        Ok((Resolved::Number(spec.fallback()), true))
                    }
                }
            }
            (ParamKind::Buffer, Some(ParamSlot::Buffer(b))) => {
                let surface = buffers.front(&b.name)?;
                Ok((
                    Resolved::Texture(TextureBinding {
                        buffer: b.name.clone(),
                        surface,
                        strength: b.strength as f32,
                    }),
                    false,
                ))
            }
            (kind, slot) => Err(LoopwaveError::configuration(format!(
                "malformed argument '{}' of '{op}': expected {kind:?}, got {slot:?}",
                spec.name
            ))),
        }
    }

    /// Resolve every slot of `root` in canonical preorder.
    pub fn resolve(&self, root: &Node, buffers: &BufferRegistry) -> LoopwaveResult<ResolvedParams> {
        let mut out = ResolvedParams::default();
        for node in preorder(root) {
            let op = node.op();
            for (i, spec) in op.params().iter().enumerate() {
                let (value, substituted) =
                    self.resolve_slot(op, spec, node.params().get(i), buffers)?;
                out.substitutions += usize::from(substituted);
                match value {
                    Resolved::Number(v) => out.values.push(v as f32),
                    Resolved::Texture(t) => out.textures.push(t),
                }
            }
        }
        Ok(out)
    }
}

/// Run a time function, treating a panic like a returned error.
fn call_time_fn(f: &TimeFn, time: f64) -> Result<f64, TimeFnError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(time))).unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        Err(TimeFnError::new(format!("panicked: {msg}")))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/param/resolver.rs"]
mod tests;
