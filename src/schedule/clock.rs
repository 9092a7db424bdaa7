use std::time::{Duration, Instant};

use crate::foundation::core::{Fps, TickIndex};

/// How the scheduler derives the shared time value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClockMode {
    /// `time = start + speed * tick / fps`; reproducible, never sleeps.
    #[default]
    Fixed,
    /// Wall clock since the first tick, paced to the tick rate.
    Realtime,
}

/// Time source for one scheduler.
#[derive(Debug)]
pub(crate) struct Clock {
    mode: ClockMode,
    fps: Fps,
    speed: f64,
    start_time: f64,
    origin: Option<Instant>,
    last: Option<f64>,
}

impl Clock {
    pub(crate) fn new(mode: ClockMode, fps: Fps, speed: f64, start_time: f64) -> Self {
        Self {
            mode,
            fps,
            speed,
            start_time,
            origin: None,
            last: None,
        }
    }

    pub(crate) fn set_fps(&mut self, fps: Fps) {
        self.fps = fps;
    }

    /// Time observed by `tick`. Never decreases across calls.
    pub(crate) fn time_at(&mut self, tick: TickIndex) -> f64 {
        let elapsed = match self.mode {
            ClockMode::Fixed => self.fps.ticks_to_secs(tick.0),
            ClockMode::Realtime => self.origin.get_or_insert_with(Instant::now).elapsed().as_secs_f64(),
        };
        let t = self.start_time + self.speed * elapsed;
        let t = match self.last {
            Some(prev) if t < prev => prev,
            _ => t,
        };
        self.last = Some(t);
        t
    }

    /// How long to wait before `tick` is due. Always zero in fixed mode.
    pub(crate) fn wait_before(&self, tick: TickIndex) -> Duration {
        match (self.mode, self.origin) {
            (ClockMode::Realtime, Some(origin)) => {
                let due = origin + Duration::from_secs_f64(self.fps.ticks_to_secs(tick.0));
                due.saturating_duration_since(Instant::now())
            }
            _ => Duration::ZERO,
        }
    }
}
