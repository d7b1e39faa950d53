//! Optional neural inference seam for the retune engine.
//!
//! The engine can delegate part of each block to an externally supplied
//! model. This crate defines only the boundary: the flat-slice
//! [`InferenceBackend`] trait, the tensor contract the engine expects from
//! a model, and the [`ModelSession`] lifecycle (register runtime → load
//! model → enable). Actual runtimes are external collaborators registered
//! through a [`BackendFactory`]; with none registered the engine uses its
//! traditional pipeline.

mod backend;
pub use backend::{
    BackendCapabilities, BackendFactory, InferenceBackend, InferenceError, InferenceReply,
    InferenceRequest, AUDIO_INPUT_NAME, AUDIO_OUTPUT_NAME, CONFIDENCE_OUTPUT_NAME,
    MODEL_AUDIO_LEN, PITCH_INPUT_NAME, STRENGTH_INPUT_NAME,
};

mod session;
pub use session::ModelSession;
