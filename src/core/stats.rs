//! Frame statistics

use std::collections::VecDeque;

/// Rolling statistics over recent frame deltas
#[derive(Debug)]
pub struct FrameStats {
    /// Frame time history in seconds
    frame_times: VecDeque<f64>,
    max_samples: usize,
    fps: f64,
    avg_frame_time_ms: f64,
    total_frames: u64,
    /// Simulated time since start in seconds
    elapsed: f64,
}

impl FrameStats {
    /// Create a tracker averaging over the last `max_samples` frames
    #[must_use]
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            fps: 0.0,
            avg_frame_time_ms: 0.0,
            total_frames: 0,
            elapsed: 0.0,
        }
    }

    /// Record a frame with the given delta time
    pub fn record_frame(&mut self, delta_seconds: f64) {
        self.total_frames += 1;
        self.elapsed += delta_seconds;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta_seconds);

        let total: f64 = self.frame_times.iter().sum();
        let count = self.frame_times.len() as f64;
        if total > 0.0 {
            self.avg_frame_time_ms = total / count * 1000.0;
            self.fps = count / total;
        } else {
            self.avg_frame_time_ms = 0.0;
            self.fps = 0.0;
        }
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[must_use]
    pub fn avg_frame_time_ms(&self) -> f64 {
        self.avg_frame_time_ms
    }

    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Get a formatted stats string
    #[must_use]
    pub fn format_stats(&self) -> String {
        format!(
            "FPS: {:.1} | Frame: {:.2}ms | Frames: {}",
            self.fps, self.avg_frame_time_ms, self.total_frames
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}
