use std::time::Duration;

/// Timing snapshot for one published frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameTime {
    /// Interval since the previously ticked timestamp, clamped.
    pub interval: Duration,

    /// Presentation timestamp of this frame in nanoseconds.
    pub timestamp_ns: i64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Measures intervals between presentation timestamps.
///
/// One clock per surface. Intervals are derived from the timestamps passed
/// to [`tick`](Self::tick), not from wall time, so they describe the stream
/// as the compositor sees it. A timestamp that does not advance (the same
/// frame presented twice) yields the minimum interval.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<i64>,
    frame_index: u64,
    min_interval: Duration,
    max_interval: Duration,
}

impl FrameClock {
    /// Creates a clock clamping intervals to `[100 µs, 250 ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom interval clamps.
    pub fn with_clamps(min_interval: Duration, max_interval: Duration) -> Self {
        debug_assert!(min_interval <= max_interval);
        Self {
            last: None,
            frame_index: 0,
            min_interval,
            max_interval,
        }
    }

    /// Forgets the previous timestamp, e.g. after the surface was recreated.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Records `timestamp_ns` and returns the interval since the previous tick.
    ///
    /// The first tick after construction or [`reset`](Self::reset) reports the
    /// minimum interval.
    pub fn tick(&mut self, timestamp_ns: i64) -> FrameTime {
        let elapsed = self
            .last
            .map(|last| timestamp_ns.saturating_sub(last).max(0) as u64)
            .map(Duration::from_nanos)
            .unwrap_or(self.min_interval);

        self.last = Some(timestamp_ns);

        let ft = FrameTime {
            interval: elapsed.clamp(self.min_interval, self.max_interval),
            timestamp_ns,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
