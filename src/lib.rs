//! # retune - real-time monophonic pitch correction
//!
//! A streaming pitch-correction engine built from modular subsystems:
//!
//! - **retune-core** - shared types, lock-free frame ring, latency metering
//! - **retune-dsp** - pitch detection, time-domain pitch shifting, musical
//!   quantization
//! - **retune-neural** - optional inference seam for externally supplied
//!   correction models
//!
//! ## Pipeline
//!
//! Each block flows one way: downmix to mono → autocorrelation pitch
//! estimate → scale quantization → time-domain resynthesis. The engine is
//! callable from a real-time audio thread; processing is synchronous and
//! allocation-free after construction.
//!
//! ## Quick Start
//!
//! ```
//! use retune::prelude::*;
//!
//! let mut engine = RetuneEngine::builder()
//!     .sample_rate(44_100)
//!     .buffer_size(512)
//!     .channels(1)
//!     .scale(Scale::Major, 60)
//!     .build()
//!     .unwrap();
//!
//! // A slightly flat C4
//! let input: Vec<AudioFrame> = (0..512)
//!     .map(|i| {
//!         let t = i as f32 / 44_100.0;
//!         AudioFrame::from_samples(vec![0.5 * (2.0 * std::f32::consts::PI * 260.0 * t).sin()])
//!     })
//!     .collect();
//! let mut output = vec![AudioFrame::new(1); 512];
//!
//! let result = engine.process(&input, &mut output);
//! assert!(result.success);
//! ```
//!
//! ## Feature Flags
//!
//! - `serialization` - serde derives on the plain-data types

/// Re-export of retune-core for direct access
pub use retune_core as core;

pub use retune_core::{
    AudioFrame, EngineConfig, Error, FrameRingBuffer, Mode, Note, PerformanceMetrics,
    PitchReadout, ProcessingParams, ProcessingResult, Result, Sample, DEFAULT_BUFFER_SIZE,
    DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE,
};

/// DSP building blocks
pub use retune_dsp as dsp;

pub use retune_dsp::{
    GridResolution, PitchDetector, PitchShifter, Quantizer, Scale, TimeSignature, MAX_TEMPO_BPM,
    MIN_TEMPO_BPM,
};

/// Neural inference seam
pub use retune_neural as neural;

pub use retune_neural::{
    BackendCapabilities, BackendFactory, InferenceBackend, InferenceError, InferenceReply,
    InferenceRequest, ModelSession, MODEL_AUDIO_LEN,
};

mod builder;
mod engine;

pub use builder::RetuneEngineBuilder;
pub use engine::RetuneEngine;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{RetuneEngine, RetuneEngineBuilder};

    pub use retune_core::{
        AudioFrame, Mode, Note, PerformanceMetrics, ProcessingParams, ProcessingResult,
    };

    pub use retune_dsp::{GridResolution, Quantizer, Scale, TimeSignature};
}
