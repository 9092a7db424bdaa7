use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "loopwave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the presented buffer at one tick as a PNG.
    Frame(FrameArgs),
    /// Render a PNG sequence.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Print graphs, kernel signatures and instruction counts.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct Source {
    /// Patch JSON file.
    #[arg(long, conflicts_with = "preset")]
    patch: Option<PathBuf>,

    /// Built-in preset name (`cell`, `cell-original`).
    #[arg(long)]
    preset: Option<String>,

    /// Canvas width for presets.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Canvas height for presets.
    #[arg(long, default_value_t = 360)]
    height: u32,
}

#[derive(Args, Debug)]
struct Run {
    /// Evaluate graphs and rows on a rayon pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Time units per second.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Time observed by the first tick.
    #[arg(long, default_value_t = 0.0)]
    start_time: f64,
}

impl Run {
    fn opts(&self, background: Option<loopwave::Rgba>) -> loopwave::SchedulerOpts {
        loopwave::SchedulerOpts {
            parallel: self.parallel,
            threads: self.threads,
            speed: self.speed,
            start_time: self.start_time,
            background,
            ..loopwave::SchedulerOpts::default()
        }
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: Source,
    #[command(flatten)]
    run: Run,

    /// Tick index (0-based).
    #[arg(long, default_value_t = 0)]
    tick: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    source: Source,
    #[command(flatten)]
    run: Run,

    /// Number of ticks to render.
    #[arg(long)]
    ticks: u64,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    #[command(flatten)]
    source: Source,
    #[command(flatten)]
    run: Run,

    /// Number of ticks to render.
    #[arg(long)]
    ticks: u64,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
    /// Fail instead of overwriting an existing output file.
    #[arg(long = "no-overwrite", action = ArgAction::SetFalse)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    source: Source,

    /// Also print each kernel's instruction stream.
    #[arg(long, default_value_t = false)]
    disassemble: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Video(args) => cmd_video(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load_patch(src: &Source) -> anyhow::Result<loopwave::Patch> {
    match (&src.patch, &src.preset) {
        (Some(path), _) => {
            let file = loopwave::PatchFile::from_path(path)?;
            file.to_patch()
                .with_context(|| format!("build patch '{}'", path.display()))
        }
        (None, Some(name)) => {
            let canvas = loopwave::Canvas::new(src.width, src.height)?;
            Ok(loopwave::presets::preset(name, canvas)?)
        }
        (None, None) => anyhow::bail!("one of --patch or --preset is required"),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.source)?;
    let mut sched = loopwave::Scheduler::new(patch, args.run.opts(None))?;
    let ticks = args
        .tick
        .checked_add(1)
        .ok_or_else(|| anyhow::anyhow!("--tick {} is out of range", args.tick))?;
    sched.run(ticks, &mut loopwave::NullSink)?;
    let frame = sched.present()?;
    loopwave::write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.source)?;
    let mut sched = loopwave::Scheduler::new(patch, args.run.opts(None))?;
    let mut sink = loopwave::PngSequenceSink::new(&args.out_dir);
    let stats = sched.run(args.ticks, &mut sink)?;

    eprintln!(
        "wrote {} frames to {} ({} substitutions)",
        stats.ticks,
        args.out_dir.display(),
        stats.substitutions
    );
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.source)?;
    let background = Some(loopwave::Rgba::new(0.0, 0.0, 0.0, 1.0));
    let mut sched = loopwave::Scheduler::new(patch, args.run.opts(background))?;

    let sink_opts = loopwave::FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
        bg_rgba: [0, 0, 0, 255],
    };
    let mut sink = loopwave::FfmpegSink::new(sink_opts);
    let _stats = sched.run(args.ticks, &mut sink)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.source)?;
    let canvas = patch.canvas();
    println!(
        "canvas {}x{} @ {}/{} fps, presenting '{}'",
        canvas.width,
        canvas.height,
        patch.fps().num,
        patch.fps().den,
        patch.present()
    );
    println!("buffers: {}", patch.buffers().join(", "));

    let sched = loopwave::Scheduler::new(patch, loopwave::SchedulerOpts::default())?;
    for (graph, kernel) in sched.patch().graphs().iter().zip(sched.kernels()) {
        println!(
            "{} <- {}\n  kernel {} ({} instrs, {} params, {} textures)",
            graph.target(),
            graph.root(),
            kernel.signature(),
            kernel.instruction_count(),
            kernel.param_count(),
            kernel.texture_count()
        );
        if args.disassemble {
            for line in loopwave::disassemble(kernel) {
                println!("    {line}");
            }
        }
    }
    let cache = sched.cache_stats();
    println!("kernel cache: {} hits, {} misses", cache.hits, cache.misses);
    Ok(())
}
