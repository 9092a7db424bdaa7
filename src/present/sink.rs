use crate::foundation::core::{Fps, TickIndex};
use crate::foundation::error::LoopwaveResult;

/// A presented frame: RGBA8 pixels, row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Whether color channels are premultiplied by alpha. Presented frames are straight.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 value at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).and_then(|p| p.try_into().ok())
    }
}

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Tick rate of the producing scheduler.
    pub fps: Fps,
}

/// Display surface contract.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`TickIndex`] order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> LoopwaveResult<()>;
    /// Push one presented frame.
    fn push_frame(&mut self, idx: TickIndex, frame: &FrameRGBA) -> LoopwaveResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> LoopwaveResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(TickIndex, FrameRGBA)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(TickIndex, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LoopwaveResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: TickIndex, frame: &FrameRGBA) -> LoopwaveResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LoopwaveResult<()> {
        Ok(())
    }
}

/// Sink that drops every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn begin(&mut self, _cfg: SinkConfig) -> LoopwaveResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: TickIndex, _frame: &FrameRGBA) -> LoopwaveResult<()> {
        Ok(())
    }

    fn end(&mut self) -> LoopwaveResult<()> {
        Ok(())
    }
}
