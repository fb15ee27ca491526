use std::time::{Duration, Instant};

/// Pipeline throughput report over one interval.
#[derive(Debug, Clone, Copy)]
pub struct PaceReport {
    pub fps: f32,
    /// Mean time spent inside the processing stage per frame.
    pub mean_busy: Duration,
}

/// Tracks frames per second and per-frame processing time.
pub struct PaceCounter {
    frame_count: u32,
    busy_total: Duration,
    last_time: Instant,
    interval: Duration,
}

impl PaceCounter {
    /// Create a new counter with a 1 second reporting interval.
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            busy_total: Duration::ZERO,
            last_time: Instant::now(),
            interval: Duration::from_secs(1),
        }
    }

    /// Record one frame and how long its processing stage took.
    /// Returns Some(report) once per reporting interval, otherwise None.
    pub fn update(&mut self, busy: Duration) -> Option<PaceReport> {
        self.frame_count += 1;
        self.busy_total += busy;
        let elapsed = self.last_time.elapsed();

        if elapsed >= self.interval {
            let report = PaceReport {
                fps: self.frame_count as f32 / elapsed.as_secs_f32(),
                mean_busy: self.busy_total / self.frame_count,
            };
            self.frame_count = 0;
            self.busy_total = Duration::ZERO;
            self.last_time = Instant::now();
            Some(report)
        } else {
            None
        }
    }
}

impl Default for PaceCounter {
    fn default() -> Self {
        Self::new()
    }
}
