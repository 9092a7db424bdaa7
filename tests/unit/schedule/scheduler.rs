use super::*;
use crate::foundation::core::{Canvas, Fps};
use crate::graph::node::{osc, shape, solid, src};
use crate::param::slot::{ParamSlot, TimeFnError};
use crate::present::sink::{InMemorySink, NullSink};

fn canvas() -> Canvas {
    Canvas::new(4, 4).unwrap()
}

fn scheduler(patch: Patch) -> Scheduler {
    Scheduler::new(patch, SchedulerOpts::default()).unwrap()
}

fn begun() -> InMemorySink {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 4,
        height: 4,
        fps: Fps::default(),
    })
    .unwrap();
    sink
}

#[test]
fn phase_is_idle_between_ticks() {
    let patch = Patch::builder(canvas())
        .graph(solid((1, 1, 1)).out_primary())
        .build()
        .unwrap();
    let mut s = scheduler(patch);
    assert_eq!(s.phase(), TickPhase::Idle);
    s.tick(&mut NullSink).unwrap();
    assert_eq!(s.phase(), TickPhase::Idle);
    assert_eq!(s.next_tick(), TickIndex(1));
}

#[test]
fn feedback_is_visible_one_tick_later() {
    let patch = Patch::builder(canvas())
        .graph(solid((1, 0, 0)).out("a"))
        .graph(src("a").out_primary())
        .build()
        .unwrap();
    let mut s = scheduler(patch);
    let mut sink = begun();
    s.tick(&mut sink).unwrap();
    s.tick(&mut sink).unwrap();

    let frames = sink.frames();
    assert_eq!(frames[0].1.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(frames[1].1.pixel(1, 1), Some([255, 0, 0, 255]));
}

#[test]
fn declaration_order_does_not_change_latency() {
    let patch = Patch::builder(canvas())
        .graph(src("a").out_primary())
        .graph(solid((0, 1, 0)).out("a"))
        .build()
        .unwrap();
    let mut s = scheduler(patch);
    let mut sink = begun();
    s.tick(&mut sink).unwrap();
    s.tick(&mut sink).unwrap();
    assert_eq!(sink.frames()[0].1.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(sink.frames()[1].1.pixel(0, 0), Some([0, 255, 0, 255]));
}

#[test]
fn report_counts_work() {
    let patch = Patch::builder(canvas())
        .graph(shape(4).out("a"))
        .graph(osc(10).modulate("a", 0.1).out_primary())
        .build()
        .unwrap();
    let mut s = scheduler(patch);
    let r = s.tick(&mut NullSink).unwrap();
    assert_eq!(r.tick, TickIndex(0));
    assert_eq!(r.time, 0.0);
    assert_eq!(r.graphs_executed, 2);
    assert_eq!(r.buffers_swapped, 2);
    assert_eq!(r.substitutions, 0);
    assert_eq!(r.cache.misses, 2);
}

#[test]
fn failing_time_function_does_not_stop_the_tick() {
    let bad = ParamSlot::try_time(|_| Err(TimeFnError::new("boom")));
    let patch = Patch::builder(canvas())
        .graph(osc(bad).out_primary())
        .build()
        .unwrap();
    let mut s = scheduler(patch);
    let r = s.tick(&mut NullSink).unwrap();
    assert_eq!(r.substitutions, 1);
    assert_eq!(s.stats().substitutions, 1);
}

#[test]
fn run_begins_and_ends_the_sink() {
    let patch = Patch::builder(canvas())
        .fps(Fps::new(30, 1).unwrap())
        .graph(solid((1, 1, 1)).out_primary())
        .build()
        .unwrap();
    let mut s = scheduler(patch);
    let mut sink = InMemorySink::new();
    let stats = s.run(3, &mut sink).unwrap();
    assert_eq!(stats.ticks, 3);
    assert_eq!(sink.config().unwrap().fps, Fps::new(30, 1).unwrap());
    let ticks: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(ticks, vec![0, 1, 2]);
}

#[test]
fn run_until_stops_when_requested() {
    let patch = Patch::builder(canvas())
        .graph(solid((1, 1, 1)).out_primary())
        .build()
        .unwrap();
    let mut s = scheduler(patch);
    let shutdown = ShutdownHandle::new();
    shutdown.request();
    let stats = s.run_until(&mut NullSink, &shutdown).unwrap();
    assert_eq!(stats.ticks, 0);
}

#[test]
fn reload_keeps_buffers_and_reuses_kernels() {
    let first = Patch::builder(canvas())
        .graph(solid((1, 1, 1)).out("a"))
        .graph(src("a").out_primary())
        .build()
        .unwrap();
    let mut s = scheduler(first);
    s.tick(&mut NullSink).unwrap();

    let second = Patch::builder(canvas())
        .graph(solid((0, 0, 1)).out("a"))
        .graph(src("a").out_primary())
        .build()
        .unwrap();
    s.reload(second).unwrap();
    assert_eq!(s.cache_stats().misses, 2);
    assert_eq!(s.cache_stats().hits, 2);

    // Buffer "a" still holds white from before the reload.
    s.tick(&mut NullSink).unwrap();
    assert_eq!(s.present().unwrap().pixel(2, 2), Some([255, 255, 255, 255]));
    s.tick(&mut NullSink).unwrap();
    assert_eq!(s.present().unwrap().pixel(2, 2), Some([0, 0, 255, 255]));
}

#[test]
fn reload_rejects_canvas_change() {
    let patch = |c| {
        Patch::builder(c)
            .graph(solid((1, 1, 1)).out_primary())
            .build()
            .unwrap()
    };
    let mut s = scheduler(patch(canvas()));
    let err = s.reload(patch(Canvas::new(8, 8).unwrap())).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn parallel_ticks_match_serial_ticks() {
    let build = || {
        Patch::builder(canvas())
            .graph(shape(4).out("a"))
            .graph(osc(10).modulate("a", 0.1).out_primary())
            .build()
            .unwrap()
    };
    let mut serial = scheduler(build());
    let mut parallel = Scheduler::new(
        build(),
        SchedulerOpts {
            parallel: true,
            threads: Some(2),
            ..SchedulerOpts::default()
        },
    )
    .unwrap();
    let (mut a, mut b) = (begun(), begun());
    for _ in 0..3 {
        serial.tick(&mut a).unwrap();
        parallel.tick(&mut b).unwrap();
    }
    assert_eq!(a.frames(), b.frames());
}

#[test]
fn non_finite_speed_is_rejected() {
    let patch = Patch::builder(canvas())
        .graph(solid((1, 1, 1)).out_primary())
        .build()
        .unwrap();
    let opts = SchedulerOpts {
        speed: f64::NAN,
        ..SchedulerOpts::default()
    };
    assert!(Scheduler::new(patch, opts).is_err());
}

#[test]
fn negative_speed_is_rejected() {
    let patch = Patch::builder(canvas())
        .graph(solid((1, 1, 1)).out_primary())
        .build()
        .unwrap();
    let opts = SchedulerOpts {
        speed: -1.0,
        ..SchedulerOpts::default()
    };
    let err = Scheduler::new(patch, opts).err().unwrap();
    assert!(err.is_configuration());
}

struct FailOnce {
    failed: bool,
    frames: Vec<(TickIndex, FrameRGBA)>,
}

impl FrameSink for FailOnce {
    fn begin(&mut self, _cfg: SinkConfig) -> LoopwaveResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: TickIndex, frame: &FrameRGBA) -> LoopwaveResult<()> {
        if !self.failed {
            self.failed = true;
            return Err(LoopwaveError::evaluation("sink unavailable"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LoopwaveResult<()> {
        Ok(())
    }
}

#[test]
fn sink_failure_still_commits_the_tick() {
    let patch = Patch::builder(canvas())
        .graph(solid((1, 0, 0)).out("a"))
        .graph(src("a").out_primary())
        .build()
        .unwrap();
    let mut s = scheduler(patch);
    let mut sink = FailOnce {
        failed: false,
        frames: Vec::new(),
    };

    assert!(s.tick(&mut sink).is_err());
    assert_eq!(s.phase(), TickPhase::Idle);
    assert_eq!(s.next_tick(), TickIndex(1));
    assert_eq!(s.stats().ticks, 1);

    let r = s.tick(&mut sink).unwrap();
    assert_eq!(r.tick, TickIndex(1));
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0].0, TickIndex(1));
    assert_eq!(sink.frames[0].1.pixel(1, 1), Some([255, 0, 0, 255]));
}
