//! Time-domain pitch shifting with envelope following.
//!
//! Resamples each block through a fractional phase accumulator at the
//! strength-blended ratio between the detected and target fundamentals,
//! multiplying in a peak envelope follower so the output tracks the input's
//! amplitude contour.

use retune_core::{AudioFrame, ProcessingParams, ProcessingResult};

/// Pitch ratio bounds applied after strength blending; keeps extreme shifts
/// from collapsing into artifacts.
const MIN_PITCH_RATIO: f32 = 0.5;
const MAX_PITCH_RATIO: f32 = 2.0;

/// Confidence reported for a successfully shifted block.
const SHIFT_CONFIDENCE: f32 = 0.8;

/// Monophonic pitch shifter.
///
/// Two registers persist across calls: the fractional read phase and the
/// envelope level. Both are cleared by [`reset`](Self::reset).
pub struct PitchShifter {
    sample_rate: u32,
    overlap_size: u32,
    attack_time: f32,
    release_time: f32,
    attack_coeff: f32,
    release_coeff: f32,
    preserve_formants: bool,
    phase: f32,
    envelope: f32,
}

impl PitchShifter {
    pub fn new(sample_rate: u32, buffer_size: usize) -> Self {
        let params = ProcessingParams::default();
        let grain_size = buffer_size * 2;
        let mut shifter = Self {
            sample_rate,
            overlap_size: (grain_size / 4) as u32,
            attack_time: params.attack_time,
            release_time: params.release_time,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            preserve_formants: params.preserve_formants,
            phase: 0.0,
            envelope: 0.0,
        };
        shifter.update_coefficients();
        shifter
    }

    pub fn set_parameters(&mut self, params: &ProcessingParams) {
        self.attack_time = params.attack_time;
        self.release_time = params.release_time;
        self.preserve_formants = params.preserve_formants;
        self.update_coefficients();
    }

    /// Formant handling flag. The time-domain resampler does not alter the
    /// spectral envelope, so the flag is informational; it is accepted and
    /// persisted.
    pub fn set_preserve_formants(&mut self, preserve: bool) {
        self.preserve_formants = preserve;
    }

    pub fn preserve_formants(&self) -> bool {
        self.preserve_formants
    }

    /// Reported latency of the shifted path, in samples.
    pub fn latency_samples(&self) -> u32 {
        self.overlap_size
    }

    fn update_coefficients(&mut self) {
        let attack_samples = self.attack_time * self.sample_rate as f32;
        let release_samples = self.release_time * self.sample_rate as f32;
        self.attack_coeff = 1.0 - (-1.0 / attack_samples).exp();
        self.release_coeff = 1.0 - (-1.0 / release_samples).exp();
    }

    /// Shift `input` from `input_pitch` toward `target_pitch` by `strength`
    /// into `output`.
    ///
    /// An unvoiced block (`input_pitch <= 0`) or zero strength copies the
    /// input bit-exactly with no state update, `success == true` and zero
    /// confidence. Mismatched slice lengths fail the call with the output
    /// untouched.
    pub fn process(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        input_pitch: f32,
        target_pitch: f32,
        strength: f32,
    ) -> ProcessingResult {
        let mut result = ProcessingResult {
            detected_pitch: input_pitch,
            corrected_pitch: target_pitch,
            ..Default::default()
        };

        if input.is_empty() || output.len() != input.len() {
            return result;
        }

        if input_pitch <= 0.0 || strength <= 0.0 {
            output.copy_from_slice(input);
            result.success = true;
            return result;
        }

        let ratio = pitch_ratio(input_pitch, target_pitch, strength);
        self.resample(input, output, ratio);

        result.success = true;
        result.confidence = SHIFT_CONFIDENCE;
        result.latency_samples = self.overlap_size;
        result
    }

    /// Shift one frame. The shift is computed on channel 0 and the result is
    /// broadcast to every output channel.
    pub fn process_frame(
        &mut self,
        input: &AudioFrame,
        output: &mut AudioFrame,
        input_pitch: f32,
        target_pitch: f32,
        strength: f32,
    ) -> ProcessingResult {
        if input.channels() != output.channels() || input.channels() == 0 {
            return ProcessingResult {
                detected_pitch: input_pitch,
                corrected_pitch: target_pitch,
                ..Default::default()
            };
        }

        let sample = [input.samples()[0]];
        let mut shifted = [0.0f32];
        let result = self.process(&sample, &mut shifted, input_pitch, target_pitch, strength);
        output.fill(shifted[0]);
        result
    }

    fn resample(&mut self, input: &[f32], output: &mut [f32], ratio: f32) {
        let n = input.len();
        for j in 0..n {
            let k = self.phase as usize;
            let t = self.phase - k as f32;

            let resampled = if k + 1 < n {
                input[k] * (1.0 - t) + input[k + 1] * t
            } else if k < n {
                input[k]
            } else {
                0.0
            };

            self.phase += ratio;
            if self.phase >= n as f32 {
                self.phase = 0.0;
            }

            let target = input[j].abs();
            if target > self.envelope {
                self.envelope += self.attack_coeff * (target - self.envelope);
            } else {
                self.envelope += self.release_coeff * (target - self.envelope);
            }

            output[j] = resampled * self.envelope;
        }
    }

    /// Clear the phase accumulator and envelope level.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.envelope = 0.0;
    }
}

/// Blend the raw `target/input` ratio by `strength` and clamp it.
fn pitch_ratio(input_pitch: f32, target_pitch: f32, strength: f32) -> f32 {
    if input_pitch <= 0.0 || target_pitch <= 0.0 {
        return 1.0;
    }
    let raw = target_pitch / input_pitch;
    (1.0 + strength * (raw - 1.0)).clamp(MIN_PITCH_RATIO, MAX_PITCH_RATIO)
}
