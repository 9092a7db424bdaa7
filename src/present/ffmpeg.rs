use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::foundation::core::TickIndex;
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::present::sink::{FrameRGBA, FrameSink, SinkConfig};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Opaque color under translucent pixels (RGBA8; alpha is ignored).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Options writing `out_path` over black, overwriting.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<Vec<u8>>,
}

impl Encoder {
    fn spawn(args: Vec<String>) -> LoopwaveResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("spawn ffmpeg")?;
        let (Some(stdin), Some(mut err)) = (child.stdin.take(), child.stderr.take()) else {
            return Err(LoopwaveError::evaluation("ffmpeg pipes were not opened"));
        };
        // ffmpeg blocks once its stderr pipe fills, so it is drained concurrently.
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = err.read_to_end(&mut buf);
            buf
        });
        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn finish(self) -> LoopwaveResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
        } = self;
        drop(stdin);
        let status = child.wait().context("wait for ffmpeg")?;
        let log = stderr.join().unwrap_or_default();
        if status.success() {
            return Ok(());
        }
        Err(LoopwaveError::evaluation(format!(
            "ffmpeg exited with {status}: {}",
            String::from_utf8_lossy(&log).trim()
        )))
    }
}

/// Sink that spawns the system `ffmpeg` and streams opaque RGBA8 ticks to it.
///
/// Translucent pixels are flattened over [`FfmpegSinkOpts::bg_rgba`]. Frames whose pixels are all
/// opaque are written through untouched.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    cfg: Option<SinkConfig>,
    scratch: Vec<u8>,
    last: Option<TickIndex>,
    written: u64,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`. Nothing is spawned before [`FrameSink::begin`].
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            scratch: Vec::new(),
            last: None,
            written: 0,
        }
    }

    /// Frames handed to ffmpeg so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    fn check_output(&self, cfg: &SinkConfig) -> LoopwaveResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LoopwaveError::configuration("video canvas must be non-empty"));
        }
        if cfg.width % 2 != 0 || cfg.height % 2 != 0 {
            return Err(LoopwaveError::configuration(format!(
                "video canvas {}x{} must have even sides for yuv420p",
                cfg.width, cfg.height
            )));
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(LoopwaveError::configuration(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        Ok(())
    }
}

fn encoder_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let mut args: Vec<String> = vec![
        if opts.overwrite { "-y" } else { "-n" }.into(),
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-s".into(),
        format!("{}x{}", cfg.width, cfg.height),
        // Input rate; must precede `-i`.
        "-r".into(),
        format!("{}/{}", cfg.fps.num, cfg.fps.den),
        "-i".into(),
        "pipe:0".into(),
    ];
    args.extend(
        ["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"]
            .map(String::from),
    );
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LoopwaveResult<()> {
        self.check_output(&cfg)?;
        let Some(version) = ffmpeg_version() else {
            return Err(LoopwaveError::evaluation(
                "video output needs `ffmpeg` on PATH, but it was not found",
            ));
        };
        if let Some(parent) = self.opts.out_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }

        self.encoder = Some(Encoder::spawn(encoder_args(&cfg, &self.opts))?);
        tracing::info!(out = %self.opts.out_path.display(), %version, "ffmpeg started");
        self.scratch = vec![0; cfg.width as usize * cfg.height as usize * 4];
        self.cfg = Some(cfg);
        self.last = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: TickIndex, frame: &FrameRGBA) -> LoopwaveResult<()> {
        let (Some(cfg), Some(encoder)) = (&self.cfg, self.encoder.as_mut()) else {
            return Err(LoopwaveError::evaluation("ffmpeg sink is not running"));
        };
        if self.last.is_some_and(|last| idx <= last) {
            return Err(LoopwaveError::evaluation(format!(
                "tick {} arrived after tick {}",
                idx.0,
                self.last.map_or(0, |t| t.0)
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(LoopwaveError::evaluation(format!(
                "frame is {}x{}, video is {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let bytes = if frame.data.chunks_exact(4).all(|px| px[3] == 255) {
            &frame.data[..]
        } else {
            flatten_onto(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;
            &self.scratch[..]
        };
        encoder
            .stdin
            .write_all(bytes)
            .context("write frame to ffmpeg")?;
        self.last = Some(idx);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> LoopwaveResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| LoopwaveError::evaluation("ffmpeg sink is not running"))?;
        self.cfg = None;
        encoder.finish()?;
        tracing::info!(frames = self.written, out = %self.opts.out_path.display(), "video written");
        Ok(())
    }
}

/// Composite straight-alpha `src` over the opaque `bg` into `dst`.
fn flatten_onto(dst: &mut [u8], src: &[u8], bg: [u8; 4]) -> LoopwaveResult<()> {
    if dst.len() != src.len() || src.len() % 4 != 0 {
        return Err(LoopwaveError::evaluation(format!(
            "frame holds {} bytes, expected {}",
            src.len(),
            dst.len()
        )));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u32::from(s[3]);
        for c in 0..3 {
            let v = u32::from(s[c]) * a + u32::from(bg[c]) * (255 - a);
            d[c] = ((v + 127) / 255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// First line of `ffmpeg -version`, or `None` when ffmpeg cannot be run.
fn ffmpeg_version() -> Option<String> {
    let out = Command::new("ffmpeg")
        .arg("-version")
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout);
    Some(text.lines().next().unwrap_or("ffmpeg").trim().to_owned())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    ffmpeg_version().is_some()
}
