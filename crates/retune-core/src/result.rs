//! Per-block processing outcome.

/// Outcome of one processing call.
///
/// Errors are reported in-band rather than by unwinding: a violated
/// precondition yields `success == false` with the output untouched, while
/// an undetectable pitch (silence, noise, out-of-range signal) keeps
/// `success == true` with `detected_pitch == 0.0` and the audio passed
/// through.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ProcessingResult {
    pub success: bool,
    /// Hz, 0.0 if unvoiced
    pub detected_pitch: f32,
    /// Hz, the target the block was shifted toward
    pub corrected_pitch: f32,
    /// 0.0..1.0
    pub confidence: f32,
    /// Processing latency in samples
    pub latency_samples: u32,
}
