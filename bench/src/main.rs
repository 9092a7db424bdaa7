use std::time::{Duration, Instant};

use anyhow::Context as _;
use sha2::Digest as _;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    ticks: u64,
    warmup: u32,
    repeats: u32,
    preset: String,
    parallel: bool,
    threads: Option<usize>,
}

#[derive(Clone, Debug, Default)]
struct RunMetrics {
    setup: Duration,
    tick_min: Duration,
    tick_max: Duration,
    ticks_total: Duration,
    wall_total: Duration,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("--width/--height must be > 0");
    }
    if args.ticks == 0 {
        anyhow::bail!("--ticks must be > 0");
    }

    for _ in 0..args.warmup {
        run_once(&args)?;
    }

    let mut runs = Vec::with_capacity(args.repeats as usize);
    let mut digests = std::collections::BTreeSet::new();
    for i in 0..args.repeats {
        let (m, digest) = run_once(&args)?;
        eprintln!(
            "run {i:>3}: wall={:.3}ms ticks={:.3}ms per_tick={:.3}ms",
            m.wall_total.as_secs_f64() * 1000.0,
            m.ticks_total.as_secs_f64() * 1000.0,
            m.ticks_total.as_secs_f64() * 1000.0 / args.ticks as f64,
        );
        digests.insert(digest);
        runs.push(m);
    }

    report_percentiles(&runs);
    match digests.len() {
        0 => {}
        1 => eprintln!("\nfinal frame sha256 (stable): {}", digests.iter().next().map_or("", String::as_str)),
        n => anyhow::bail!("final frame differs across runs ({n} distinct digests)"),
    }
    Ok(())
}

fn run_once(args: &BenchArgs) -> anyhow::Result<(RunMetrics, String)> {
    let wall = Instant::now();
    let canvas = loopwave::Canvas::new(args.width, args.height)?;
    let patch = loopwave::presets::preset(&args.preset, canvas)?;
    let opts = loopwave::SchedulerOpts {
        parallel: args.parallel,
        threads: args.threads,
        ..loopwave::SchedulerOpts::default()
    };
    let mut sched = loopwave::Scheduler::new(patch, opts).context("create scheduler")?;
    let mut m = RunMetrics {
        setup: wall.elapsed(),
        tick_min: Duration::MAX,
        ..RunMetrics::default()
    };

    let mut sink = loopwave::NullSink;
    for _ in 0..args.ticks {
        let t0 = Instant::now();
        sched.tick(&mut sink)?;
        let d = t0.elapsed();
        m.tick_min = m.tick_min.min(d);
        m.tick_max = m.tick_max.max(d);
        m.ticks_total += d;
    }
    let frame = sched.present()?;
    m.wall_total = wall.elapsed();
    Ok((m, sha256_hex(&frame.data)))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 640,
        height: 360,
        ticks: 120,
        warmup: 1,
        repeats: 10,
        preset: "cell".to_owned(),
        parallel: false,
        threads: None,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_u32(args.next(), "--width")?,
            "--height" => out.height = parse_u32(args.next(), "--height")?,
            "--ticks" => out.ticks = u64::from(parse_u32(args.next(), "--ticks")?),
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--preset" => {
                out.preset = args.next().ok_or_else(|| {
                    anyhow::anyhow!(
                        "missing value for --preset (expected one of: {})",
                        loopwave::presets::PRESET_NAMES.join(", ")
                    )
                })?
            }
            "--parallel" => out.parallel = true,
            "--threads" => out.threads = Some(parse_usize(args.next(), "--threads")?),
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"loopwave-bench

Ticks a preset repeatedly and reports p50/p90/p99 for each stage.

Usage:
  cargo run -q --release
  cargo run -q --release -- --ticks 300 --repeats 20
  cargo run -q --release -- --parallel --threads 4

Args:
  --width N        (default 640)
  --height N       (default 360)
  --ticks N        ticks per run (default 120)
  --warmup N       (default 1)
  --repeats N      (default 10)
  --preset NAME    (default cell)
  --parallel       evaluate graphs and rows on a rayon pool
  --threads N      worker threads for parallel mode (default auto)
"#
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn parse_usize(v: Option<String>, flag: &str) -> anyhow::Result<usize> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<usize>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn report_percentiles(runs: &[RunMetrics]) {
    type Getter = fn(&RunMetrics) -> Duration;
    type Field = (&'static str, Getter);

    fn collect(runs: &[RunMetrics], f: Getter) -> Vec<Duration> {
        let mut v = runs.iter().map(f).collect::<Vec<_>>();
        v.sort_by_key(|d| d.as_nanos());
        v
    }

    fn p(v: &[Duration], p: f64) -> Duration {
        if v.is_empty() {
            return Duration::ZERO;
        }
        let n = v.len();
        let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
        v[rank - 1]
    }

    fn fmt_ms(d: Duration) -> String {
        format!("{:.3}ms", d.as_secs_f64() * 1000.0)
    }

    let fields: &[Field] = &[
        ("setup", |m| m.setup),
        ("tick_min", |m| m.tick_min),
        ("tick_max", |m| m.tick_max),
        ("ticks_total", |m| m.ticks_total),
        ("wall_total", |m| m.wall_total),
    ];

    eprintln!("\npercentiles across runs (p50/p90/p99):");
    for (name, getter) in fields {
        let v = collect(runs, *getter);
        eprintln!(
            "  {name:12} p50={:>10}  p90={:>10}  p99={:>10}",
            fmt_ms(p(&v, 0.50)),
            fmt_ms(p(&v, 0.90)),
            fmt_ms(p(&v, 0.99)),
        );
    }
}
