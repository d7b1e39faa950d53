//! Shared types and real-time primitives for the retune engine.
//!
//! # Contents
//!
//! - [`EngineConfig`] / [`ProcessingParams`] / [`Mode`]: configuration
//! - [`AudioFrame`] / [`Note`] / [`ProcessingResult`]: data model
//! - [`FrameRingBuffer`]: lock-free SPSC streaming seam
//! - [`ProcessMeter`] / [`PerformanceMetrics`]: latency accounting
//! - [`PitchReadout`]: lock-free published pitch state

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{EngineConfig, Mode, ProcessingParams};

mod frame;
pub use frame::{
    AudioFrame, Sample, DEFAULT_BUFFER_SIZE, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE,
};

mod note;
pub use note::Note;

mod result;
pub use result::ProcessingResult;

mod ring;
pub use ring::FrameRingBuffer;

mod readout;
pub use readout::PitchReadout;

mod metering;
pub use metering::{PerformanceMetrics, ProcessMeter};
