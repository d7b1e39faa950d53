//! Model lifecycle and enable/disable state for the optional ML path.

use crate::backend::{BackendFactory, InferenceBackend, InferenceError, InferenceReply, InferenceRequest};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Owns the optional inference backend and its enable state.
///
/// Without a registered [`BackendFactory`] every load fails and the engine
/// keeps using its traditional pipeline; this is the normal state for
/// builds without an ML runtime.
pub struct ModelSession {
    factory: Option<BackendFactory>,
    backend: Option<Box<dyn InferenceBackend>>,
    model_path: Option<PathBuf>,
    enabled: bool,
    last_inference_ms: f32,
}

impl ModelSession {
    pub fn new() -> Self {
        Self {
            factory: None,
            backend: None,
            model_path: None,
            enabled: false,
            last_inference_ms: 0.0,
        }
    }

    /// Register the runtime used to load models.
    pub fn register_backend(&mut self, factory: BackendFactory) {
        self.factory = Some(factory);
    }

    /// Attempt to load a model; returns whether the load succeeded.
    pub fn load_model(&mut self, path: &Path) -> bool {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "model file not found");
            return false;
        }

        let Some(factory) = &self.factory else {
            tracing::info!("no inference runtime registered - using traditional processing");
            return false;
        };

        match factory(path) {
            Ok(backend) => {
                tracing::info!(
                    path = %path.display(),
                    backend = %backend.capabilities().name,
                    "model loaded"
                );
                self.backend = Some(backend);
                self.model_path = Some(path.to_path_buf());
                true
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "model load failed");
                self.backend = None;
                self.model_path = None;
                self.enabled = false;
                false
            }
        }
    }

    /// Enable or disable inference. Silently stays disabled while no model
    /// is loaded.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled && self.backend.is_some();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_loaded(&self) -> bool {
        self.backend.is_some()
    }

    /// Run one forward pass, tracking its wall-clock time.
    pub fn forward(
        &mut self,
        request: &InferenceRequest<'_>,
    ) -> Result<InferenceReply, InferenceError> {
        let backend = self
            .backend
            .as_mut()
            .ok_or(InferenceError::BackendUnavailable)?;

        let start = Instant::now();
        let reply = backend.forward(request)?;
        self.last_inference_ms = start.elapsed().as_secs_f32() * 1000.0;
        Ok(reply)
    }

    /// Human-readable model state.
    pub fn model_info(&self) -> String {
        match (&self.backend, &self.model_path) {
            (Some(backend), Some(path)) => {
                let mut info = format!(
                    "ML model loaded: {} [{}]",
                    path.display(),
                    backend.capabilities().name
                );
                if self.last_inference_ms > 0.0 {
                    info.push_str(&format!(
                        " (last inference: {:.3} ms)",
                        self.last_inference_ms
                    ));
                }
                info
            }
            _ => "No ML model loaded - using traditional processing".to_string(),
        }
    }
}

impl Default for ModelSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendCapabilities;

    /// Test backend that echoes the request audio back.
    struct EchoBackend;

    impl InferenceBackend for EchoBackend {
        fn forward(
            &mut self,
            request: &InferenceRequest<'_>,
        ) -> Result<InferenceReply, InferenceError> {
            Ok(InferenceReply {
                audio: request.audio.to_vec(),
                confidence: Some(0.9),
            })
        }

        fn capabilities(&self) -> BackendCapabilities {
            BackendCapabilities {
                name: "echo".to_string(),
                has_gpu: false,
            }
        }
    }

    fn echo_factory() -> BackendFactory {
        Box::new(|_path| Ok(Box::new(EchoBackend)))
    }

    fn temp_model_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, b"model").unwrap();
        path
    }

    #[test]
    fn test_load_without_factory_fails() {
        let mut session = ModelSession::new();
        let path = temp_model_file("retune-session-no-factory.onnx");
        assert!(!session.load_model(&path));
        assert!(!session.is_loaded());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let mut session = ModelSession::new();
        session.register_backend(echo_factory());
        assert!(!session.load_model(Path::new("/nonexistent/model.onnx")));
    }

    #[test]
    fn test_enable_requires_loaded_model() {
        let mut session = ModelSession::new();
        session.set_enabled(true);
        assert!(!session.is_enabled());

        session.register_backend(echo_factory());
        let path = temp_model_file("retune-session-enable.onnx");
        assert!(session.load_model(&path));
        session.set_enabled(true);
        assert!(session.is_enabled());

        session.set_enabled(false);
        assert!(!session.is_enabled());
    }

    #[test]
    fn test_forward_and_info() {
        let mut session = ModelSession::new();
        session.register_backend(echo_factory());
        let path = temp_model_file("retune-session-forward.onnx");
        assert!(session.load_model(&path));

        let audio = vec![0.25f32; 512];
        let reply = session
            .forward(&InferenceRequest {
                audio: &audio,
                detected_hz: Some(440.0),
                strength: Some(1.0),
            })
            .unwrap();
        assert_eq!(reply.audio, audio);
        assert_eq!(reply.confidence, Some(0.9));

        let info = session.model_info();
        assert!(info.contains("echo"), "unexpected info: {}", info);
    }

    #[test]
    fn test_info_without_model() {
        let session = ModelSession::new();
        assert!(session.model_info().contains("traditional processing"));
    }

    #[test]
    fn test_forward_without_backend_errors() {
        let mut session = ModelSession::new();
        let audio = vec![0.0f32; 512];
        let err = session
            .forward(&InferenceRequest {
                audio: &audio,
                detected_hz: None,
                strength: None,
            })
            .unwrap_err();
        assert!(matches!(err, InferenceError::BackendUnavailable));
    }
}
