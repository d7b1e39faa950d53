//! Engine configuration and processing parameters.

use crate::frame::{DEFAULT_BUFFER_SIZE, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
use crate::{Error, Result};

/// Immutable engine construction parameters.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct EngineConfig {
    /// Hz; immutable after construction
    pub sample_rate: u32,
    /// Samples per analysis block
    pub buffer_size: usize,
    /// Channels per frame
    pub channels: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate < 8_000 || self.sample_rate > 384_000 {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.buffer_size == 0 {
            return Err(Error::InvalidBufferSize(self.buffer_size));
        }
        if self.channels == 0 {
            return Err(Error::InvalidChannelCount(self.channels));
        }
        if !self.buffer_size.is_power_of_two() {
            tracing::warn!(
                buffer_size = self.buffer_size,
                "buffer size is not a power of two"
            );
        }
        Ok(())
    }
}

/// Engine operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Mode {
    /// Only pitch correction (target = detected pitch)
    PitchCorrection,
    /// Only quantization (audio passthrough, pitches still reported)
    Quantization,
    /// Pitch correction toward the quantized scale target
    #[default]
    FullAutotune,
    /// Pass-through
    Bypass,
}

/// Runtime processing parameters.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ProcessingParams {
    pub sample_rate: u32,
    pub buffer_size: usize,
    /// 0.0 = no correction, 1.0 = full correction
    pub correction_strength: f32,
    /// Blend in MIDI space between the input note and the nearest scale note
    pub quantize_strength: f32,
    /// Envelope follower attack, seconds
    pub attack_time: f32,
    /// Envelope follower release, seconds
    pub release_time: f32,
    /// Accepted and persisted; the time-domain shifter does not alter formants
    pub preserve_formants: bool,
    /// Beats per minute, used by timing quantization
    pub tempo_bpm: f32,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            correction_strength: 1.0,
            quantize_strength: 0.8,
            attack_time: 0.01,
            release_time: 0.1,
            preserve_formants: true,
            tempo_bpm: 120.0,
        }
    }
}
