//! DSP building blocks for the retune engine: pitch detection, time-domain
//! pitch shifting, and musical quantization.
//!
//! All three processors are single-threaded and allocation-free after
//! construction; the engine driver owns one of each and runs them in
//! sequence (detect → quantize → shift) per block.

mod detector;
pub use detector::{
    PitchDetector, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_FREQUENCY, DEFAULT_MIN_FREQUENCY,
    DEFAULT_SMOOTHING_FACTOR,
};

mod quantizer;
pub use quantizer::{
    GridResolution, Quantizer, Scale, TimeSignature, MAX_TEMPO_BPM, MIN_TEMPO_BPM,
};

mod shifter;
pub use shifter::PitchShifter;

pub mod window;
