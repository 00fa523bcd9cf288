use std::time::{Duration, Instant};

/// Frames counted over one sampling interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsSample {
    pub frames: u32,
    pub elapsed: Duration,
}

impl FpsSample {
    pub fn per_second(&self) -> f32 {
        let secs = self.elapsed.as_secs_f32();
        if secs <= f32::EPSILON {
            return 0.0;
        }
        self.frames as f32 / secs
    }
}

/// Counts presented frames and reports the count once per interval.
///
/// Counting and sampling are separate so a stalled loop still reports zero.
#[derive(Debug)]
pub struct FpsMonitor {
    interval: Duration,
    window_start: Instant,
    frames: u32,
    last: Option<FpsSample>,
}

impl FpsMonitor {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            window_start: now,
            frames: 0,
            last: None,
        }
    }

    pub fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    /// Emits a sample and resets the counter once the interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<FpsSample> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let sample = FpsSample {
            frames: self.frames,
            elapsed,
        };
        self.frames = 0;
        self.window_start = now;
        self.last = Some(sample);
        Some(sample)
    }

    pub fn pending_frames(&self) -> u32 {
        self.frames
    }

    pub fn last_sample(&self) -> Option<FpsSample> {
        self.last
    }

    /// When the next sample is due.
    pub fn next_deadline(&self) -> Instant {
        self.window_start + self.interval
    }
}
