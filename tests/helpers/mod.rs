//! Test helpers and fixtures for retune integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use retune::prelude::*;

/// Default test sample rate.
pub const TEST_SAMPLE_RATE: u32 = 44_100;

/// Standard block size for deterministic testing.
pub const TEST_BUFFER_SIZE: usize = 512;

/// Tolerance for exact operations (passthrough, unity gain).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Create a stereo test engine with the standard rate and block size.
pub fn test_engine() -> RetuneEngine {
    RetuneEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .buffer_size(TEST_BUFFER_SIZE)
        .channels(2)
        .build()
        .expect("failed to create test engine")
}

/// Generate a sine wave at the given frequency.
pub fn generate_sine(frequency: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            0.5 * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence.
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Generate reproducible white noise in -1..1 from a simple LCG.
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Spread mono samples across frames with the given channel count.
pub fn frames_from_mono(samples: &[f32], channels: usize) -> Vec<AudioFrame> {
    samples
        .iter()
        .map(|&s| AudioFrame::from_samples(vec![s; channels]))
        .collect()
}

/// Allocate silent destination frames.
pub fn empty_frames(count: usize, channels: usize) -> Vec<AudioFrame> {
    vec![AudioFrame::new(channels); count]
}

/// RMS level of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Check two signals for approximate equality.
pub fn signals_approx_equal(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}
