use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::TickIndex;
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::present::sink::{FrameRGBA, FrameSink, SinkConfig};

/// Writes every presented frame to `<dir>/<prefix><tick:06>.png`.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    cfg: Option<SinkConfig>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing into `dir` with the default `frame_` prefix.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame_".to_owned(),
            cfg: None,
            written: Vec::new(),
        }
    }

    /// Override the file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Paths written so far, in tick order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, idx: TickIndex) -> PathBuf {
        self.dir.join(format!("{}{:06}.png", self.prefix, idx.0))
    }
}

/// Encode `frame` as a PNG at `path`, creating parent directories.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> LoopwaveResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> LoopwaveResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: TickIndex, frame: &FrameRGBA) -> LoopwaveResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LoopwaveError::evaluation("png sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(LoopwaveError::evaluation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        let path = self.path_for(idx);
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> LoopwaveResult<()> {
        tracing::info!(frames = self.written.len(), dir = %self.dir.display(), "png sequence written");
        self.cfg = None;
        Ok(())
    }
}
