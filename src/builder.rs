//! RetuneEngineBuilder for configuring the engine.

use retune_core::{EngineConfig, Mode, ProcessingParams, Result, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
use retune_dsp::Scale;

use crate::RetuneEngine;

/// Builder for [`RetuneEngine`].
///
/// # Example
///
/// ```
/// use retune::prelude::*;
///
/// let engine = RetuneEngine::builder()
///     .sample_rate(48_000)
///     .channels(2)
///     .scale(Scale::Minor, 57)
///     .build()
///     .unwrap();
/// assert_eq!(engine.buffer_size(), 512);
/// ```
pub struct RetuneEngineBuilder {
    sample_rate: u32,
    buffer_size: Option<usize>,
    channels: usize,
    mode: Mode,
    scale: Scale,
    key_center: i32,
    params: Option<ProcessingParams>,
}

impl Default for RetuneEngineBuilder {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: None,
            channels: DEFAULT_CHANNELS,
            mode: Mode::default(),
            scale: Scale::default(),
            key_center: 60,
            params: None,
        }
    }
}

impl RetuneEngineBuilder {
    /// Set the sample rate (default: 44.1 kHz).
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the analysis block size. If unset, the recommended size for the
    /// sample rate is used.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }

    /// Set the channel count (default: 2).
    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Set the initial operating mode (default: FullAutotune).
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the quantization scale and its root note (default: C major).
    pub fn scale(mut self, scale: Scale, key_center: i32) -> Self {
        self.scale = scale;
        self.key_center = key_center;
        self
    }

    /// Set the initial processing parameters.
    pub fn parameters(mut self, params: ProcessingParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<RetuneEngine> {
        let buffer_size = self
            .buffer_size
            .unwrap_or_else(|| RetuneEngine::recommended_buffer_size(self.sample_rate));

        let config = EngineConfig {
            sample_rate: self.sample_rate,
            buffer_size,
            channels: self.channels,
        };

        let mut params = self.params.unwrap_or_default();
        params.sample_rate = config.sample_rate;
        params.buffer_size = config.buffer_size;

        RetuneEngine::from_config(config, params, self.mode, self.scale, self.key_center)
    }
}
