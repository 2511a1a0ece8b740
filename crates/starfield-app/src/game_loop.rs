//! Variable-timestep frame clock.
//!
//! The background animates directly from wall-clock time: each frame reads
//! total elapsed seconds (drives the cloud rotations) and the delta since the
//! previous frame (drives the shooting stars). Deltas are clamped so a window
//! that was hidden or stalled does not fling shooting stars across the sky.

use std::time::{Duration, Instant};
use tracing::warn;

/// Maximum delta handed to the scene, in seconds.
pub const MAX_FRAME_DELTA: f64 = 0.25;

/// How often frame statistics are reported when enabled.
pub const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// Timing for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous frame, clamped to [`MAX_FRAME_DELTA`].
    pub delta: f32,
}

/// Averaged frame statistics over one reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub fps: f64,
    pub clamped_frames: u64,
}

pub struct FrameClock {
    start: Instant,
    previous: Instant,
    frame_count: u64,
    window_start: Instant,
    window_frames: u64,
    window_clamped: u64,
}

impl FrameClock {
    /// Creates a clock starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose zero point is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            previous: start,
            frame_count: 0,
            window_start: start,
            window_frames: 0,
            window_clamped: 0,
        }
    }

    /// Measure the frame ending now.
    pub fn tick(&mut self) -> FrameTime {
        self.step(Instant::now())
    }

    /// Measure the frame ending at `now`.
    pub fn step(&mut self, now: Instant) -> FrameTime {
        let mut delta = now.saturating_duration_since(self.previous).as_secs_f64();
        self.previous = now;

        if delta > MAX_FRAME_DELTA {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                delta * 1000.0,
                MAX_FRAME_DELTA * 1000.0
            );
            delta = MAX_FRAME_DELTA;
            self.window_clamped += 1;
        }

        self.frame_count += 1;
        self.window_frames += 1;

        FrameTime {
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            delta: delta as f32,
        }
    }

    /// Returns statistics once per [`STATS_INTERVAL`] and starts a new window.
    pub fn take_stats(&mut self, now: Instant) -> Option<FrameStats> {
        let span = now.saturating_duration_since(self.window_start);
        if span < STATS_INTERVAL {
            return None;
        }

        let stats = FrameStats {
            frames: self.window_frames,
            fps: self.window_frames as f64 / span.as_secs_f64(),
            clamped_frames: self.window_clamped,
        };
        self.window_start = now;
        self.window_frames = 0;
        self.window_clamped = 0;
        Some(stats)
    }

    /// Total frames measured.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
