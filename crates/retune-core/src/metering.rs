//! Per-call latency and CPU accounting.

use core::time::Duration;

/// Number of retained latency measurements.
const LATENCY_HISTORY_LEN: usize = 100;

/// Rolling window of the most recent per-call latencies, milliseconds.
#[derive(Debug)]
struct LatencyWindow {
    samples: [f32; LATENCY_HISTORY_LEN],
    len: usize,
    next: usize,
}

impl LatencyWindow {
    fn new() -> Self {
        Self {
            samples: [0.0; LATENCY_HISTORY_LEN],
            len: 0,
            next: 0,
        }
    }

    fn push(&mut self, ms: f32) {
        self.samples[self.next] = ms;
        self.next = (self.next + 1) % LATENCY_HISTORY_LEN;
        self.len = (self.len + 1).min(LATENCY_HISTORY_LEN);
    }

    fn mean(&self) -> f32 {
        if self.len == 0 {
            return 0.0;
        }
        let sum: f32 = self.samples[..self.len].iter().sum();
        sum / self.len as f32
    }

    fn clear(&mut self) {
        self.samples.fill(0.0);
        self.len = 0;
        self.next = 0;
    }
}

/// Snapshot of engine performance counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PerformanceMetrics {
    /// Mean of the last up to 100 per-call wall-clock times
    pub average_latency_ms: f32,
    /// Last call's wall-clock time relative to the block's real-time budget
    pub cpu_usage_percent: f32,
    /// Calls whose wall-clock time exceeded the real-time budget
    pub buffer_underruns: u64,
    /// Accumulates the configured buffer size per call
    pub frames_processed: u64,
}

/// Accumulates per-call wall-clock measurements for the engine driver.
#[derive(Debug)]
pub struct ProcessMeter {
    history: LatencyWindow,
    metrics: PerformanceMetrics,
    /// Real-time budget for one full buffer, milliseconds
    budget_ms: f32,
    buffer_size: usize,
}

impl ProcessMeter {
    pub fn new(sample_rate: u32, buffer_size: usize) -> Self {
        Self {
            history: LatencyWindow::new(),
            metrics: PerformanceMetrics::default(),
            budget_ms: buffer_size as f32 / sample_rate as f32 * 1000.0,
            buffer_size,
        }
    }

    /// Record one processing call.
    ///
    /// `frames_processed` advances by the configured buffer size per call,
    /// regardless of the block length actually processed.
    pub fn record(&mut self, elapsed: Duration) {
        let ms = elapsed.as_secs_f32() * 1000.0;

        self.history.push(ms);
        self.metrics.average_latency_ms = self.history.mean();
        self.metrics.cpu_usage_percent = ms / self.budget_ms * 100.0;
        if ms > self.budget_ms {
            self.metrics.buffer_underruns += 1;
        }
        self.metrics.frames_processed += self.buffer_size as u64;
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.metrics
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.metrics = PerformanceMetrics::default();
    }
}
