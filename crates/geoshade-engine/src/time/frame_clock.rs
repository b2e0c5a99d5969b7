use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Snapshot with an explicit delta.
    pub fn from_dt(dt: f32, frame_index: u64) -> Self {
        Self { dt, frame_index }
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Each `tick` returns the time since the previous one and restarts the
/// measurement, so deltas never overlap and always sum to the wall time
/// between the first and the last tick.
///
/// The clock starts on the first `tick`, which reports a zero delta. Setup
/// work done between construction and the first frame is not counted.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();

        self.last = Some(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}
