use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::render::surface::Surface;

struct Slot {
    /// Result of the last completed tick; shared with readers.
    front: Arc<Surface>,
    /// Write side. `None` while checked out to an executor.
    back: Option<Surface>,
    pending: bool,
}

/// Named double-buffered render targets.
///
/// Readers only ever see `front`; writers only ever touch `back`. The two sides are exchanged by
/// [`BufferRegistry::swap`], which is a no-op unless something was written since the last swap.
pub struct BufferRegistry {
    canvas: Canvas,
    slots: HashMap<String, Slot>,
    order: Vec<String>,
}

impl BufferRegistry {
    /// Empty registry whose buffers are sized to `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            slots: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Resolution of every buffer.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Create `name` if absent. Returns `true` when a buffer was created.
    pub fn register(&mut self, name: &str) -> bool {
        if self.slots.contains_key(name) {
            return false;
        }
        tracing::debug!(buffer = name, "registering buffer");
        self.slots.insert(
            name.to_owned(),
            Slot {
                front: Arc::new(Surface::new(self.canvas)),
                back: Some(Surface::new(self.canvas)),
                pending: false,
            },
        );
        self.order.push(name.to_owned());
        true
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    fn slot(&self, name: &str) -> LoopwaveResult<&Slot> {
        self.slots
            .get(name)
            .ok_or_else(|| LoopwaveError::configuration(format!("unregistered buffer '{name}'")))
    }

    fn slot_mut(&mut self, name: &str) -> LoopwaveResult<&mut Slot> {
        self.slots
            .get_mut(name)
            .ok_or_else(|| LoopwaveError::configuration(format!("unregistered buffer '{name}'")))
    }

    /// Previous-frame contents of `name`.
    pub fn front(&self, name: &str) -> LoopwaveResult<Arc<Surface>> {
        Ok(Arc::clone(&self.slot(name)?.front))
    }

    /// Run `producer` against the back side of `name` and mark it pending.
    pub fn write<R>(
        &mut self,
        name: &str,
        producer: impl FnOnce(&mut Surface) -> R,
    ) -> LoopwaveResult<R> {
        let mut back = self.checkout(name)?;
        let out = producer(&mut back);
        self.commit(name, back)?;
        Ok(out)
    }

    /// Take the back side of `name` out of the registry so it can be written on another thread.
    pub(crate) fn checkout(&mut self, name: &str) -> LoopwaveResult<Surface> {
        self.slot_mut(name)?.back.take().ok_or_else(|| {
            LoopwaveError::evaluation(format!("back side of buffer '{name}' is already checked out"))
        })
    }

    /// Return a checked-out back side and mark it pending.
    pub(crate) fn commit(&mut self, name: &str, back: Surface) -> LoopwaveResult<()> {
        let canvas = self.canvas;
        let slot = self.slot_mut(name)?;
        if back.width() != canvas.width || back.height() != canvas.height {
            return Err(LoopwaveError::evaluation(format!(
                "buffer '{name}' written at {}x{}, expected {}x{}",
                back.width(),
                back.height(),
                canvas.width,
                canvas.height
            )));
        }
        slot.back = Some(back);
        slot.pending = true;
        Ok(())
    }

    /// Return a checked-out back side without marking it pending, discarding its contents.
    pub(crate) fn restore(&mut self, name: &str, back: Surface) -> LoopwaveResult<()> {
        let slot = self.slot_mut(name)?;
        slot.back = Some(back);
        Ok(())
    }

    /// Whether `name` has a write waiting for the next swap.
    pub fn is_pending(&self, name: &str) -> LoopwaveResult<bool> {
        Ok(self.slot(name)?.pending)
    }

    /// Exchange the sides of `name`. Returns `false` (and changes nothing) when no write is
    /// pending.
    pub fn swap(&mut self, name: &str) -> LoopwaveResult<bool> {
        let canvas = self.canvas;
        let slot = self.slot_mut(name)?;
        if !slot.pending {
            return Ok(false);
        }
        let Some(written) = slot.back.take() else {
            return Err(LoopwaveError::evaluation(format!(
                "cannot swap buffer '{name}' while its back side is checked out"
            )));
        };
        let old_front = std::mem::replace(&mut slot.front, Arc::new(written));
        // Readers from the finished tick may still hold the old front; they keep their copy and
        // the write side gets fresh storage.
        slot.back = Some(Arc::try_unwrap(old_front).unwrap_or_else(|_| Surface::new(canvas)));
        slot.pending = false;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffers.rs"]
mod tests;
