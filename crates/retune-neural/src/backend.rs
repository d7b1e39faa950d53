//! Framework-agnostic inference backend abstraction.
//!
//! Defines the [`InferenceBackend`] trait that ML runtimes (ONNX Runtime,
//! Burn, candle, etc.) implement. All data crosses the boundary as flat
//! `&[f32]`; no framework-specific tensor types appear in the API.

use std::path::Path;
use thiserror::Error;

/// Samples per model invocation: the `audio_buffer` input and the
/// `corrected_audio` output are both `[1, 512]` float32 tensors.
pub const MODEL_AUDIO_LEN: usize = 512;

/// Tensor names of the model contract.
///
/// | tensor                | shape    | semantics                        |
/// |-----------------------|----------|----------------------------------|
/// | `audio_buffer`        | [1, 512] | input samples                    |
/// | `target_pitch`        | [1, 1]   | detected frequency, Hz (optional)|
/// | `correction_strength` | [1, 1]   | in [0, 1] (optional)             |
/// | `corrected_audio`     | [1, 512] | output samples                   |
/// | `confidence`          | [1, 1]   | in [0, 1] (optional)             |
pub const AUDIO_INPUT_NAME: &str = "audio_buffer";
pub const PITCH_INPUT_NAME: &str = "target_pitch";
pub const STRENGTH_INPUT_NAME: &str = "correction_strength";
pub const AUDIO_OUTPUT_NAME: &str = "corrected_audio";
pub const CONFIDENCE_OUTPUT_NAME: &str = "confidence";

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    #[error("Forward pass failed: {0}")]
    ForwardFailed(String),

    #[error("No inference runtime available")]
    BackendUnavailable,
}

/// One model invocation.
///
/// `audio` holds [`MODEL_AUDIO_LEN`] mono samples (the `audio_buffer`
/// tensor). The optional scalars map to the `target_pitch` and
/// `correction_strength` inputs; backends wrapping models without those
/// inputs ignore them.
#[derive(Debug, Clone, Copy)]
pub struct InferenceRequest<'a> {
    pub audio: &'a [f32],
    pub detected_hz: Option<f32>,
    pub strength: Option<f32>,
}

/// Model output: `corrected_audio` plus the optional `confidence` scalar.
#[derive(Debug, Clone)]
pub struct InferenceReply {
    pub audio: Vec<f32>,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct BackendCapabilities {
    /// e.g. "ONNX Runtime", "Burn/NdArray"
    pub name: String,
    pub has_gpu: bool,
}

/// Abstraction over ML inference runtimes.
///
/// Implementations are external collaborators: the engine only depends on
/// this trait and degrades to its traditional pipeline when no backend is
/// registered or a forward pass fails.
pub trait InferenceBackend: Send {
    fn forward(
        &mut self,
        request: &InferenceRequest<'_>,
    ) -> Result<InferenceReply, InferenceError>;

    fn capabilities(&self) -> BackendCapabilities;
}

/// Factory that builds a backend for a model file. Registered once on the
/// session; invoked by every successful `load_model` call.
pub type BackendFactory =
    Box<dyn Fn(&Path) -> Result<Box<dyn InferenceBackend>, InferenceError> + Send>;
