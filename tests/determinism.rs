use loopwave::{Canvas, FrameRGBA, InMemorySink, Scheduler, SchedulerOpts, presets};

fn frames(name: &str, opts: SchedulerOpts, ticks: u64) -> Vec<FrameRGBA> {
    let patch = presets::preset(name, Canvas::new(48, 27).unwrap()).unwrap();
    let mut sched = Scheduler::new(patch, opts).unwrap();
    let mut sink = InMemorySink::new();
    sched.run(ticks, &mut sink).unwrap();
    sink.frames().iter().map(|(_, f)| f.clone()).collect()
}

#[test]
fn presets_replay_identically() {
    for name in presets::PRESET_NAMES {
        let a = frames(name, SchedulerOpts::default(), 6);
        let b = frames(name, SchedulerOpts::default(), 6);
        assert_eq!(a, b, "{name}");
    }
}

#[test]
fn parallel_matches_serial() {
    let parallel = SchedulerOpts {
        parallel: true,
        threads: Some(3),
        ..SchedulerOpts::default()
    };
    for name in presets::PRESET_NAMES {
        let a = frames(name, SchedulerOpts::default(), 5);
        let b = frames(name, parallel.clone(), 5);
        assert_eq!(a, b, "{name}");
    }
}

#[test]
fn presets_produce_visible_output() {
    for name in presets::PRESET_NAMES {
        let last = frames(name, SchedulerOpts::default(), 4).pop().unwrap();
        assert!(last.data.chunks_exact(4).any(|px| px[3] > 0), "{name}");
        assert!(!last.premultiplied);
    }
}

#[test]
fn start_time_shifts_the_clock() {
    let shifted = SchedulerOpts {
        start_time: 2.0,
        ..SchedulerOpts::default()
    };
    let a = frames("cell", SchedulerOpts::default(), 1);
    let b = frames("cell", shifted, 1);
    assert_ne!(a, b);
}
