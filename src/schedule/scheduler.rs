use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::compile::cache::{CacheStats, KernelCache};
use crate::compile::kernel::CompiledKernel;
use crate::foundation::core::{Rgba, TickIndex};
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::graph::patch::Patch;
use crate::param::resolver::{ResolvedParams, Resolver};
use crate::present::compositor;
use crate::present::sink::{FrameRGBA, FrameSink, SinkConfig};
use crate::render::buffers::BufferRegistry;
use crate::render::exec::{build_thread_pool, execute};
use crate::render::surface::Surface;
use crate::schedule::clock::{Clock, ClockMode};

/// Options controlling [`Scheduler`] behavior.
#[derive(Clone, Debug)]
pub struct SchedulerOpts {
    /// Evaluate graphs and pixel rows on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Time source.
    pub clock: ClockMode,
    /// Time units per second.
    pub speed: f64,
    /// Time observed by the first tick.
    pub start_time: f64,
    /// Flatten presented frames over this opaque color.
    pub background: Option<Rgba>,
}

impl Default for SchedulerOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            clock: ClockMode::Fixed,
            speed: 1.0,
            start_time: 0.0,
            background: None,
        }
    }
}

/// Where the scheduler is within a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickPhase {
    /// Between ticks.
    #[default]
    Idle,
    /// Evaluating parameter slots.
    Resolving,
    /// Running kernels into back sides.
    Executing,
    /// Exchanging front and back sides.
    Swapping,
    /// Handing the presented buffer to the sink.
    Presenting,
}

/// Outcome of one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Tick that ran.
    pub tick: TickIndex,
    /// Shared time value every slot observed.
    pub time: f64,
    /// Graphs whose kernels ran.
    pub graphs_executed: usize,
    /// Buffers whose sides were exchanged.
    pub buffers_swapped: usize,
    /// Parameters replaced by their default after a failed time function.
    pub substitutions: usize,
    /// Kernel cache counters at the end of the tick.
    pub cache: CacheStats,
}

/// Totals over a sequence of ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Ticks completed.
    pub ticks: u64,
    /// Graph executions summed over ticks.
    pub graphs_executed: u64,
    /// Buffer swaps summed over ticks.
    pub buffers_swapped: u64,
    /// Parameter substitutions summed over ticks.
    pub substitutions: u64,
}

impl RunStats {
    fn record(&mut self, r: &TickReport) {
        self.ticks += 1;
        self.graphs_executed += r.graphs_executed as u64;
        self.buffers_swapped += r.buffers_swapped as u64;
        self.substitutions += r.substitutions as u64;
    }
}

/// Cooperative stop request, honoured between ticks.
#[derive(Clone, Debug, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Handle with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the scheduler to stop after the current tick.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Job<'a> {
    target: &'a str,
    kernel: Arc<CompiledKernel>,
    params: ResolvedParams,
    surface: Surface,
}

/// Drives a [`Patch`] tick by tick.
///
/// Every tick resolves all graphs against the same time value, runs every kernel into its target's
/// back side, and only then swaps. A graph therefore never observes a write from its own tick:
/// feedback has exactly one tick of latency regardless of declaration order.
pub struct Scheduler {
    patch: Patch,
    opts: SchedulerOpts,
    buffers: BufferRegistry,
    cache: KernelCache,
    kernels: Vec<Arc<CompiledKernel>>,
    pool: Option<rayon::ThreadPool>,
    clock: Clock,
    next_tick: TickIndex,
    phase: TickPhase,
    stats: RunStats,
}

impl Scheduler {
    /// Register the patch's buffers and compile every graph. Nothing runs yet.
    #[tracing::instrument(skip(patch, opts), fields(graphs = patch.graphs().len()))]
    pub fn new(patch: Patch, opts: SchedulerOpts) -> LoopwaveResult<Self> {
        if !opts.speed.is_finite() || !opts.start_time.is_finite() {
            return Err(LoopwaveError::configuration(
                "scheduler speed and start_time must be finite",
            ));
        }
        if opts.speed < 0.0 {
            return Err(LoopwaveError::configuration(format!(
                "scheduler speed must be >= 0, got {}",
                opts.speed
            )));
        }
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            if opts.threads.is_some() {
                tracing::debug!("'threads' is ignored unless 'parallel' is set");
            }
            None
        };

        let mut buffers = BufferRegistry::new(patch.canvas());
        for name in patch.buffers() {
            buffers.register(name);
        }
        let mut cache = KernelCache::new();
        let kernels = compile_all(&patch, &mut cache)?;
        let clock = Clock::new(opts.clock, patch.fps(), opts.speed, opts.start_time);

        tracing::info!(
            canvas = %format!("{}x{}", patch.canvas().width, patch.canvas().height),
            buffers = buffers.names().len(),
            kernels = cache.len(),
            present = patch.present(),
            "scheduler ready"
        );
        Ok(Self {
            patch,
            opts,
            buffers,
            cache,
            kernels,
            pool,
            clock,
            next_tick: TickIndex(0),
            phase: TickPhase::Idle,
            stats: RunStats::default(),
        })
    }

    /// Current phase. Always [`TickPhase::Idle`] when observed from outside a tick.
    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    /// Index the next [`Scheduler::tick`] will run.
    pub fn next_tick(&self) -> TickIndex {
        self.next_tick
    }

    /// The running patch.
    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    /// Buffer state after the last completed tick.
    pub fn buffers(&self) -> &BufferRegistry {
        &self.buffers
    }

    /// Kernels of the running graphs, in declaration order.
    pub fn kernels(&self) -> &[Arc<CompiledKernel>] {
        &self.kernels
    }

    /// Kernel cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Totals since construction.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Configuration handed to sinks.
    pub fn sink_config(&self) -> SinkConfig {
        let canvas = self.patch.canvas();
        SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.patch.fps(),
        }
    }

    /// Composite the presented buffer's front side as it stands now.
    pub fn present(&self) -> LoopwaveResult<FrameRGBA> {
        let front = self.buffers.front(self.patch.present())?;
        Ok(compositor::present(&front, self.opts.background))
    }

    /// Replace the running patch between ticks.
    ///
    /// Buffers persist by name and new names are registered; kernels come from the shared cache.
    /// On error the previous patch keeps running.
    #[tracing::instrument(skip(self, patch), fields(graphs = patch.graphs().len()))]
    pub fn reload(&mut self, patch: Patch) -> LoopwaveResult<()> {
        if patch.canvas() != self.patch.canvas() {
            return Err(LoopwaveError::configuration(format!(
                "reload cannot change canvas from {}x{} to {}x{}",
                self.patch.canvas().width,
                self.patch.canvas().height,
                patch.canvas().width,
                patch.canvas().height
            )));
        }
        let kernels = compile_all(&patch, &mut self.cache)?;
        for name in patch.buffers() {
            self.buffers.register(name);
        }
        self.clock.set_fps(patch.fps());
        self.kernels = kernels;
        self.patch = patch;
        tracing::info!(kernels = self.cache.len(), "patch reloaded");
        Ok(())
    }

    /// Run one tick and push the presented frame to `sink`, which must have been begun.
    #[tracing::instrument(skip(self, sink), fields(tick = self.next_tick.0))]
    ///
    /// Once buffers are swapped the tick counts as run: a presentation or sink failure is
    /// returned with the tick already advanced, so a retry runs the next tick.
    pub fn tick(&mut self, sink: &mut dyn FrameSink) -> LoopwaveResult<TickReport> {
        let report = match self.advance() {
            Ok(report) => report,
            Err(e) => {
                self.phase = TickPhase::Idle;
                return Err(e);
            }
        };
        self.stats.record(&report);
        self.next_tick = self.next_tick.next();

        self.phase = TickPhase::Presenting;
        let presented = self
            .present()
            .and_then(|frame| sink.push_frame(report.tick, &frame));
        self.phase = TickPhase::Idle;
        presented.map(|()| report)
    }

    fn advance(&mut self) -> LoopwaveResult<TickReport> {
        let tick = self.next_tick;

        self.phase = TickPhase::Resolving;
        let time = self.clock.time_at(tick);
        let resolver = Resolver::new(time, tick);
        let mut resolved = Vec::with_capacity(self.kernels.len());
        for graph in self.patch.graphs() {
            resolved.push(resolver.resolve(graph.root(), &self.buffers)?);
        }
        let substitutions = resolved.iter().map(|p| p.substitutions).sum();

        self.phase = TickPhase::Executing;
        let mut jobs = Vec::with_capacity(resolved.len());
        for ((graph, kernel), params) in self.patch.graphs().iter().zip(&self.kernels).zip(resolved) {
            let surface = match self.buffers.checkout(graph.target()) {
                Ok(s) => s,
                Err(e) => {
                    restore_all(&mut self.buffers, jobs);
                    return Err(e);
                }
            };
            jobs.push(Job {
                target: graph.target(),
                kernel: Arc::clone(kernel),
                params,
                surface,
            });
        }

        let run = |job: &mut Job<'_>, pool: Option<&rayon::ThreadPool>| {
            execute(&job.kernel, &job.params, time, &mut job.surface, pool)
        };
        let outcome = match &self.pool {
            Some(pool) => pool.install(|| jobs.par_iter_mut().try_for_each(|j| run(j, Some(pool)))),
            None => jobs.iter_mut().try_for_each(|j| run(j, None)),
        };
        if let Err(e) = outcome {
            restore_all(&mut self.buffers, jobs);
            return Err(e);
        }
        let graphs_executed = jobs.len();
        let mut touched = Vec::with_capacity(jobs.len());
        for job in jobs {
            self.buffers.commit(job.target, job.surface)?;
            touched.push(job.target);
        }

        self.phase = TickPhase::Swapping;
        let mut buffers_swapped = 0;
        for name in touched {
            if self.buffers.swap(name)? {
                buffers_swapped += 1;
            }
        }

        Ok(TickReport {
            tick,
            time,
            graphs_executed,
            buffers_swapped,
            substitutions,
            cache: self.cache.stats(),
        })
    }

    /// Run `ticks` ticks into `sink`, calling `begin` and `end` around them.
    pub fn run(&mut self, ticks: u64, sink: &mut dyn FrameSink) -> LoopwaveResult<RunStats> {
        let shutdown = ShutdownHandle::new();
        self.run_inner(Some(ticks), sink, &shutdown)
    }

    /// Run until `shutdown` is requested. The flag is only checked between ticks.
    pub fn run_until(
        &mut self,
        sink: &mut dyn FrameSink,
        shutdown: &ShutdownHandle,
    ) -> LoopwaveResult<RunStats> {
        self.run_inner(None, sink, shutdown)
    }

    fn run_inner(
        &mut self,
        limit: Option<u64>,
        sink: &mut dyn FrameSink,
        shutdown: &ShutdownHandle,
    ) -> LoopwaveResult<RunStats> {
        sink.begin(self.sink_config())?;
        tracing::info!(limit = ?limit, clock = ?self.opts.clock, "scheduler started");
        let mut run = RunStats::default();
        while !shutdown.is_requested() && limit.is_none_or(|n| run.ticks < n) {
            let wait = self.clock.wait_before(self.next_tick);
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
            let report = self.tick(sink)?;
            run.record(&report);
        }
        sink.end()?;
        tracing::info!(ticks = run.ticks, substitutions = run.substitutions, "scheduler stopped");
        Ok(run)
    }
}

fn compile_all(patch: &Patch, cache: &mut KernelCache) -> LoopwaveResult<Vec<Arc<CompiledKernel>>> {
    patch
        .graphs()
        .iter()
        .map(|g| {
            cache.get_or_compile(g.root()).map_err(|e| match e {
                LoopwaveError::Configuration(msg) => {
                    LoopwaveError::configuration(format!("graph '{}': {msg}", g.target()))
                }
                other => other,
            })
        })
        .collect()
}

fn restore_all(buffers: &mut BufferRegistry, jobs: Vec<Job<'_>>) {
    for job in jobs {
        if let Err(e) = buffers.restore(job.target, job.surface) {
            tracing::error!(buffer = job.target, error = %e, "failed to restore back side");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
