//! Autocorrelation pitch detection.
//!
//! Windowed time-domain autocorrelation with a peak search over the lag
//! range implied by the configured frequency bounds, a peak/zero-lag
//! confidence ratio, and exponential smoothing of the estimate across
//! blocks. Suitable for monophonic material (voice, lead instruments).

use crate::window::{apply_window, hann_window};

pub const DEFAULT_MIN_FREQUENCY: f32 = 80.0;
pub const DEFAULT_MAX_FREQUENCY: f32 = 2000.0;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.8;

/// Monophonic pitch detector.
///
/// Scratch buffers are sized to the analysis window at construction;
/// [`detect`](Self::detect) never allocates.
pub struct PitchDetector {
    sample_rate: u32,
    window_size: usize,
    min_frequency: f32,
    max_frequency: f32,
    confidence_threshold: f32,
    smoothing_factor: f32,
    previous_pitch: f32,
    window: Vec<f32>,
    windowed: Vec<f32>,
    autocorr: Vec<f32>,
}

impl PitchDetector {
    pub fn new(sample_rate: u32, window_size: usize) -> Self {
        Self {
            sample_rate,
            window_size,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY.min(sample_rate as f32 / 2.0),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            previous_pitch: 0.0,
            window: hann_window(window_size),
            windowed: vec![0.0; window_size],
            autocorr: vec![0.0; window_size],
        }
    }

    /// Lowest detectable frequency, floored at 1 Hz.
    pub fn set_min_frequency(&mut self, min_freq: f32) {
        self.min_frequency = min_freq.max(1.0);
    }

    /// Highest detectable frequency, capped at Nyquist.
    pub fn set_max_frequency(&mut self, max_freq: f32) {
        self.max_frequency = max_freq.min(self.sample_rate as f32 / 2.0);
    }

    /// Minimum peak/zero-lag ratio for an estimate to be reported.
    pub fn set_confidence_threshold(&mut self, threshold: f32) {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
    }

    /// Estimate the fundamental of `samples`, returning `(hz, confidence)`.
    ///
    /// Returns `(0.0, 0.0)` when the block is empty or longer than the
    /// analysis window, the signal is silent or aperiodic, the confidence
    /// falls below the threshold, or the peak maps outside the configured
    /// frequency range. A rejected block leaves the smoothing state
    /// untouched.
    pub fn detect(&mut self, samples: &[f32]) -> (f32, f32) {
        let n = samples.len();
        if n == 0 || n > self.window_size {
            return (0.0, 0.0);
        }

        apply_window(samples, &self.window, &mut self.windowed[..n]);
        self.compute_autocorrelation(n);

        let Some((peak_lag, confidence)) = self.find_peak(n) else {
            return (0.0, 0.0);
        };
        if confidence < self.confidence_threshold {
            return (0.0, 0.0);
        }

        let frequency = self.sample_rate as f32 / peak_lag as f32;
        if frequency < self.min_frequency || frequency > self.max_frequency {
            return (0.0, 0.0);
        }

        (self.smooth(frequency), confidence)
    }

    /// `r[lag] = Σ x[i]·x[i+lag]` over the windowed block.
    fn compute_autocorrelation(&mut self, n: usize) {
        for lag in 0..n {
            let mut sum = 0.0f32;
            for i in 0..n - lag {
                sum += self.windowed[i] * self.windowed[i + lag];
            }
            self.autocorr[lag] = sum;
        }
    }

    /// Peak lag within the valid range and the peak/zero-lag ratio.
    /// Ties go to the lowest lag.
    fn find_peak(&self, n: usize) -> Option<(usize, f32)> {
        if n < 2 {
            return None;
        }

        let min_lag = (self.sample_rate as f32 / self.max_frequency) as usize;
        let max_lag = (self.sample_rate as f32 / self.min_frequency) as usize;
        let min_lag = min_lag.clamp(1, n - 1);
        let max_lag = max_lag.min(n - 1);
        if min_lag >= max_lag {
            return None;
        }

        let mut peak_lag = min_lag;
        let mut peak_value = self.autocorr[min_lag];
        for lag in min_lag + 1..=max_lag {
            if self.autocorr[lag] > peak_value {
                peak_value = self.autocorr[lag];
                peak_lag = lag;
            }
        }

        let confidence = if self.autocorr[0] > 0.0 {
            (peak_value / self.autocorr[0]).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some((peak_lag, confidence))
    }

    /// Exponential smoothing across blocks; the first accepted estimate
    /// seeds the register directly.
    fn smooth(&mut self, pitch: f32) -> f32 {
        if self.previous_pitch == 0.0 {
            self.previous_pitch = pitch;
            return pitch;
        }

        let smoothed =
            self.smoothing_factor * self.previous_pitch + (1.0 - self.smoothing_factor) * pitch;
        self.previous_pitch = smoothed;
        smoothed
    }

    /// Clear the smoothing register and scratch buffers.
    pub fn reset(&mut self) {
        self.previous_pitch = 0.0;
        self.windowed.fill(0.0);
        self.autocorr.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_sine(sample_rate: u32, freq: f32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                0.5 * (2.0 * core::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_detect_a440() {
        let mut detector = PitchDetector::new(44_100, 512);
        let samples = generate_sine(44_100, 440.0, 512);

        let (pitch, confidence) = detector.detect(&samples);
        assert!(
            (pitch - 440.0).abs() < 10.0,
            "expected ~440 Hz, got {} Hz",
            pitch
        );
        assert!(confidence >= 0.3, "confidence too low: {}", confidence);
    }

    #[test]
    fn test_detect_various_frequencies() {
        for &freq in &[110.0f32, 220.0, 440.0, 880.0] {
            let mut detector = PitchDetector::new(44_100, 1024);
            let samples = generate_sine(44_100, freq, 1024);

            let (pitch, confidence) = detector.detect(&samples);
            assert!(confidence > 0.0, "no pitch for {} Hz", freq);
            let error = (pitch - freq).abs() / freq;
            assert!(
                error < 0.02,
                "expected {} Hz, got {} Hz ({}% error)",
                freq,
                pitch,
                error * 100.0
            );
        }
    }

    #[test]
    fn test_silence_returns_zero() {
        let mut detector = PitchDetector::new(44_100, 512);
        let samples = vec![0.0f32; 512];
        assert_eq!(detector.detect(&samples), (0.0, 0.0));
    }

    #[test]
    fn test_block_longer_than_window_is_rejected() {
        let mut detector = PitchDetector::new(44_100, 512);
        let samples = generate_sine(44_100, 440.0, 513);
        assert_eq!(detector.detect(&samples), (0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_frequency_is_rejected() {
        // 50 Hz is below the default 80 Hz floor; its period also exceeds
        // the valid lag range for a 512-sample block at 44.1 kHz.
        let mut detector = PitchDetector::new(44_100, 512);
        let samples = generate_sine(44_100, 50.0, 512);
        let (pitch, _) = detector.detect(&samples);
        assert_eq!(pitch, 0.0);
    }

    #[test]
    fn test_degenerate_lag_range() {
        let mut detector = PitchDetector::new(44_100, 512);
        // Narrow the range until no lag is valid
        detector.set_min_frequency(400.0);
        detector.set_max_frequency(410.0);
        let samples = generate_sine(44_100, 405.0, 64);
        assert_eq!(detector.detect(&samples), (0.0, 0.0));
    }

    #[test]
    fn test_smoothing_pulls_toward_history() {
        let mut detector = PitchDetector::new(44_100, 1024);

        let a440 = generate_sine(44_100, 440.0, 1024);
        let (first, _) = detector.detect(&a440);

        let a880 = generate_sine(44_100, 880.0, 1024);
        let (second, _) = detector.detect(&a880);

        // With α = 0.8 the estimate moves only 20% of the way per block
        assert!(second > first, "estimate should rise toward 880");
        assert!(
            second < 600.0,
            "estimate should be smoothed, got {}",
            second
        );
    }

    #[test]
    fn test_reset_clears_history() {
        let mut detector = PitchDetector::new(44_100, 1024);

        let a440 = generate_sine(44_100, 440.0, 1024);
        detector.detect(&a440);
        detector.reset();

        let a880 = generate_sine(44_100, 880.0, 1024);
        let (pitch, _) = detector.detect(&a880);
        assert!(
            (pitch - 880.0).abs() < 20.0,
            "post-reset estimate should be unsmoothed, got {}",
            pitch
        );
    }

    #[test]
    fn test_low_frequency_with_wide_window() {
        let mut detector = PitchDetector::new(44_100, 2048);
        let samples = generate_sine(44_100, 82.41, 2048); // E2

        let (pitch, confidence) = detector.detect(&samples);
        assert!(confidence > 0.0, "should detect E2");
        assert!(
            (pitch - 82.41).abs() / 82.41 < 0.03,
            "expected ~82.41 Hz, got {}",
            pitch
        );
    }
}
