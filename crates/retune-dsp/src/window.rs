//! Hann window generation.

use core::f32::consts::PI;

/// Precompute a Hann window: `w[i] = 0.5 * (1 - cos(2π·i / (len - 1)))`.
pub fn hann_window(len: usize) -> Vec<f32> {
    if len < 2 {
        return vec![1.0; len];
    }
    (0..len)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (len - 1) as f32).cos()))
        .collect()
}

/// Multiply `input` by the leading portion of `window` into `output`.
///
/// `output` must be at least as long as `input`, and `window` at least as
/// long as both.
#[inline]
pub fn apply_window(input: &[f32], window: &[f32], output: &mut [f32]) {
    for (i, (&x, &w)) in input.iter().zip(window).enumerate() {
        output[i] = x * w;
    }
}
