use std::time::{Duration, Instant};

/// Timing of one rendered frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped.
    pub dt: f32,
    pub now: Instant,
    /// Zero-based index of this frame.
    pub frame_index: u64,
}

/// Per-painter frame clock.
///
/// Ticked once per `render_frame`, including frames that abort, so frame
/// indices in logs and reports are never reused. Delta time is clamped: a
/// painter that sat idle (minimized window, debugger) reports at most
/// `dt_max`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    next_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self { last: None, next_index: 0, dt_min, dt_max }
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.next_index
    }

    /// Starts a frame. The first frame reports `dt_min`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).clamp(self.dt_min, self.dt_max),
            None => self.dt_min,
        };
        self.last = Some(now);

        let frame_index = self.next_index;
        self.next_index = self.next_index.wrapping_add(1);

        FrameTime { dt: dt.as_secs_f32(), now, frame_index }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
