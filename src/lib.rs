//! Loopwave is a feedback-driven procedural video synthesis engine.
//!
//! Visuals are described as chains of operator calls (`osc(10).rotate(0.5).out("o1")`). Each
//! chain is a [`Graph`] writing one named buffer; graphs may read any buffer's previous-frame
//! contents, which is how feedback loops are built. The public API is patch-oriented:
//!
//! - Build a [`Patch`] from combinators, a [`PatchFile`] or a [`presets`] entry
//! - Create a [`Scheduler`]
//! - Tick it into a [`FrameSink`]
//!
//! ```no_run
//! use loopwave::{Canvas, InMemorySink, Patch, Scheduler, SchedulerOpts, osc, shape};
//!
//! let patch = Patch::builder(Canvas::new(320, 240)?)
//!     .graph(shape((4, 0.5, 0)).out("a"))
//!     .graph(osc(10).modulate("a", 0.1).out_primary())
//!     .build()?;
//! let mut scheduler = Scheduler::new(patch, SchedulerOpts::default())?;
//! let mut sink = InMemorySink::new();
//! scheduler.run(60, &mut sink)?;
//! # Ok::<(), loopwave::LoopwaveError>(())
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub(crate) mod compile;
pub(crate) mod expression;
pub(crate) mod graph;
pub(crate) mod ops;
pub(crate) mod param;
pub(crate) mod patchfile;
pub(crate) mod present;
pub mod presets;
pub(crate) mod render;
pub(crate) mod schedule;

pub use crate::foundation::core::{Canvas, Fps, Rgba, TickIndex};
pub use crate::foundation::error::{LoopwaveError, LoopwaveResult};

pub use crate::compile::cache::{CacheStats, KernelCache};
pub use crate::compile::compiler::{compile_kernel, disassemble};
pub use crate::compile::kernel::CompiledKernel;
pub use crate::compile::signature::{Signature, signature_of};
pub use crate::expression::TimeExpr;
pub use crate::graph::args::IntoArgs;
pub use crate::graph::node::{Node, gradient, noise, osc, shape, solid, src, voronoi};
pub use crate::graph::op::{
    ColorOp, CombineOp, CoordOp, GeneratorOp, ModulateOp, OPERATOR_LIBRARY_VERSION, OpKind,
    ParamKind, ParamSpec, TransformOp,
};
pub use crate::graph::patch::{Graph, PRIMARY, Patch, PatchBuilder};
pub use crate::param::resolver::{Resolved, ResolvedParams, Resolver, TextureBinding};
pub use crate::param::slot::{BufferRef, ParamSlot, TimeFn, TimeFnError, buffer, time};
pub use crate::patchfile::PatchFile;
pub use crate::present::compositor::present;
pub use crate::present::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::present::png::{PngSequenceSink, write_png};
pub use crate::present::sink::{FrameRGBA, FrameSink, InMemorySink, NullSink, SinkConfig};
pub use crate::render::buffers::BufferRegistry;
pub use crate::render::surface::Surface;
pub use crate::schedule::clock::ClockMode;
pub use crate::schedule::scheduler::{
    RunStats, Scheduler, SchedulerOpts, ShutdownHandle, TickPhase, TickReport,
};
