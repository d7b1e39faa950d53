//! RetuneEngine: the pitch-correction pipeline driver.

use std::path::Path;
use std::time::Instant;

use retune_core::{
    AudioFrame, EngineConfig, FrameRingBuffer, Mode, PerformanceMetrics, PitchReadout,
    ProcessMeter, ProcessingParams, ProcessingResult, Result,
};
use retune_dsp::{
    PitchDetector, PitchShifter, Quantizer, Scale, TimeSignature, MAX_TEMPO_BPM, MIN_TEMPO_BPM,
};
use retune_neural::{BackendFactory, InferenceRequest, ModelSession, MODEL_AUDIO_LEN};

/// Input/output ring capacity, in blocks.
const RING_BLOCKS: usize = 4;

/// Real-time monophonic pitch-correction engine.
///
/// Owns the full pipeline: pitch detector, quantizer, pitch shifter, the
/// streaming rings, and the performance meter. Each [`process`] call runs
/// detect → quantize → shift synchronously on the calling thread and
/// allocates nothing.
///
/// # Threading
///
/// [`process`] and every configuration mutator must be driven from a single
/// thread at a time (or externally fenced so they never interleave). The
/// streaming rings are the one cross-thread seam: [`enqueue_input`] may run
/// on a producer thread concurrently with [`process_queued`] on the
/// processing thread, and [`dequeue_output`] on a consumer thread.
///
/// [`process`]: RetuneEngine::process
/// [`enqueue_input`]: RetuneEngine::enqueue_input
/// [`dequeue_output`]: RetuneEngine::dequeue_output
/// [`process_queued`]: RetuneEngine::process_queued
pub struct RetuneEngine {
    config: EngineConfig,
    params: ProcessingParams,
    mode: Mode,
    scale: Scale,
    key_center: i32,

    detector: PitchDetector,
    shifter: PitchShifter,
    quantizer: Quantizer,
    input_ring: FrameRingBuffer,
    output_ring: FrameRingBuffer,
    meter: ProcessMeter,
    ml: ModelSession,

    mono_buffer: Vec<f32>,
    ml_buffer: Vec<f32>,
    block_input: Vec<AudioFrame>,
    block_output: Vec<AudioFrame>,

    readout: PitchReadout,
    initialized: bool,
}

impl RetuneEngine {
    /// Create an engine builder.
    pub fn builder() -> crate::RetuneEngineBuilder {
        crate::RetuneEngineBuilder::default()
    }

    /// Create an engine with default parameters.
    pub fn new(sample_rate: u32, buffer_size: usize, channels: usize) -> Result<Self> {
        Self::builder()
            .sample_rate(sample_rate)
            .buffer_size(buffer_size)
            .channels(channels)
            .build()
    }

    pub(crate) fn from_config(
        config: EngineConfig,
        params: ProcessingParams,
        mode: Mode,
        scale: Scale,
        key_center: i32,
    ) -> Result<Self> {
        config.validate()?;

        let ring_capacity = config.buffer_size * RING_BLOCKS;
        let engine = Self {
            detector: PitchDetector::new(config.sample_rate, config.buffer_size),
            shifter: PitchShifter::new(config.sample_rate, config.buffer_size),
            quantizer: Quantizer::new(config.sample_rate, params.tempo_bpm),
            input_ring: FrameRingBuffer::new(ring_capacity, config.channels),
            output_ring: FrameRingBuffer::new(ring_capacity, config.channels),
            meter: ProcessMeter::new(config.sample_rate, config.buffer_size),
            ml: ModelSession::new(),
            mono_buffer: vec![0.0; config.buffer_size],
            ml_buffer: vec![0.0; MODEL_AUDIO_LEN],
            block_input: vec![AudioFrame::new(config.channels); config.buffer_size],
            block_output: vec![AudioFrame::new(config.channels); config.buffer_size],
            readout: PitchReadout::new(),
            initialized: true,
            config,
            params,
            mode,
            scale,
            key_center: key_center.clamp(0, 127),
        };

        tracing::debug!(
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            channels = config.channels,
            ?mode,
            "engine created"
        );
        Ok(engine)
    }

    /// Process one block of frames.
    ///
    /// Preconditions, violation of which returns `success == false` with the
    /// output untouched: the block is non-empty, input and output have the
    /// same length and per-frame channel shape, and the block is no longer
    /// than the configured buffer size.
    pub fn process(
        &mut self,
        input: &[AudioFrame],
        output: &mut [AudioFrame],
    ) -> ProcessingResult {
        if !self.initialized
            || input.is_empty()
            || input.len() != output.len()
            || input.len() > self.config.buffer_size
        {
            return ProcessingResult::default();
        }
        if input
            .iter()
            .zip(output.iter())
            .any(|(a, b)| a.channels() != b.channels())
        {
            return ProcessingResult::default();
        }

        let start = Instant::now();
        let result = match self.mode {
            Mode::Bypass => Self::process_bypass(input, output),
            Mode::PitchCorrection => self.process_correction(input, output, false),
            Mode::Quantization => self.process_quantization(input, output),
            Mode::FullAutotune => self.process_correction(input, output, true),
        };
        self.meter.record(start.elapsed());

        self.readout
            .publish(result.detected_pitch, result.corrected_pitch, result.confidence);
        result
    }

    /// Process a single frame; equivalent to [`process`](Self::process) with
    /// a one-frame block.
    pub fn process_frame(
        &mut self,
        input: &AudioFrame,
        output: &mut AudioFrame,
    ) -> ProcessingResult {
        self.process(core::slice::from_ref(input), core::slice::from_mut(output))
    }

    fn process_bypass(input: &[AudioFrame], output: &mut [AudioFrame]) -> ProcessingResult {
        for (src, dst) in input.iter().zip(output.iter_mut()) {
            dst.samples_mut().copy_from_slice(src.samples());
        }
        ProcessingResult {
            success: true,
            ..Default::default()
        }
    }

    fn process_correction(
        &mut self,
        input: &[AudioFrame],
        output: &mut [AudioFrame],
        quantize: bool,
    ) -> ProcessingResult {
        let n = input.len();
        self.downmix(input);

        let (pitch, confidence) = self.detector.detect(&self.mono_buffer[..n]);
        let target = if quantize {
            self.quantizer.quantize_pitch(
                pitch,
                self.scale,
                self.key_center,
                self.params.quantize_strength,
            )
        } else {
            pitch
        };

        let mut start_frame = 0;
        if self.ml.is_enabled() && self.run_ml_frame(n, pitch, output) {
            start_frame = 1;
        }

        let mut result = ProcessingResult {
            success: true,
            ..Default::default()
        };
        for i in start_frame..n {
            let frame_result = self.shifter.process_frame(
                &input[i],
                &mut output[i],
                pitch,
                target,
                self.params.correction_strength,
            );
            if !frame_result.success {
                result.success = false;
                break;
            }
            result.latency_samples = frame_result.latency_samples;
        }

        result.detected_pitch = pitch;
        result.corrected_pitch = target;
        result.confidence = confidence;
        result
    }

    /// Quantization mode is an audio passthrough that still reports the
    /// detected and quantized pitches.
    fn process_quantization(
        &mut self,
        input: &[AudioFrame],
        output: &mut [AudioFrame],
    ) -> ProcessingResult {
        let n = input.len();
        self.downmix(input);

        let (pitch, confidence) = self.detector.detect(&self.mono_buffer[..n]);
        let target = self.quantizer.quantize_pitch(
            pitch,
            self.scale,
            self.key_center,
            self.params.quantize_strength,
        );

        for (src, dst) in input.iter().zip(output.iter_mut()) {
            dst.samples_mut().copy_from_slice(src.samples());
        }

        ProcessingResult {
            success: true,
            detected_pitch: pitch,
            corrected_pitch: target,
            confidence,
            latency_samples: 0,
        }
    }

    fn downmix(&mut self, input: &[AudioFrame]) {
        for (mono, frame) in self.mono_buffer.iter_mut().zip(input) {
            *mono = frame.mono();
        }
    }

    /// Delegate the first frame of the block to the model. Returns whether
    /// the frame was written; any failure falls back to the traditional
    /// path for the whole block.
    fn run_ml_frame(&mut self, n: usize, pitch: f32, output: &mut [AudioFrame]) -> bool {
        let len = n.min(MODEL_AUDIO_LEN);
        self.ml_buffer.fill(0.0);
        self.ml_buffer[..len].copy_from_slice(&self.mono_buffer[..len]);

        let request = InferenceRequest {
            audio: &self.ml_buffer,
            detected_hz: Some(pitch),
            strength: Some(self.params.correction_strength),
        };
        match self.ml.forward(&request) {
            Ok(reply) if !reply.audio.is_empty() => {
                output[0].fill(reply.audio[0]);
                true
            }
            Ok(_) => false,
            Err(err) => {
                tracing::warn!(%err, "ml inference failed - falling back to traditional path");
                false
            }
        }
    }

    // --- streaming seam -------------------------------------------------

    /// Producer-side entry of the streaming seam: deposit frames into the
    /// input ring. Never blocks; returns the number of frames accepted.
    pub fn enqueue_input(&self, frames: &[AudioFrame]) -> usize {
        self.input_ring.write(frames)
    }

    /// Consumer-side exit of the streaming seam: collect processed frames
    /// from the output ring.
    pub fn dequeue_output(&self, frames: &mut [AudioFrame]) -> usize {
        self.output_ring.read(frames)
    }

    /// Drain up to one block from the input ring, process it, and push the
    /// result to the output ring. With nothing queued this is a successful
    /// no-op.
    pub fn process_queued(&mut self) -> ProcessingResult {
        let mut block_input = std::mem::take(&mut self.block_input);
        let mut block_output = std::mem::take(&mut self.block_output);

        let count = self.input_ring.read(&mut block_input);
        let result = if count == 0 {
            ProcessingResult {
                success: true,
                ..Default::default()
            }
        } else {
            let result = self.process(&block_input[..count], &mut block_output[..count]);
            if result.success {
                self.output_ring.write(&block_output[..count]);
            }
            result
        };

        self.block_input = block_input;
        self.block_output = block_output;
        result
    }

    // --- configuration --------------------------------------------------

    /// Replace the processing parameters. Out-of-range strengths and tempo
    /// are clamped silently; sample rate and buffer size stay pinned to the
    /// construction config.
    pub fn set_parameters(&mut self, params: ProcessingParams) {
        self.params = params;
        self.params.correction_strength = params.correction_strength.clamp(0.0, 1.0);
        self.params.quantize_strength = params.quantize_strength.clamp(0.0, 1.0);
        self.params.tempo_bpm = params.tempo_bpm.clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM);
        self.params.sample_rate = self.config.sample_rate;
        self.params.buffer_size = self.config.buffer_size;

        self.shifter.set_parameters(&self.params);
        self.quantizer.set_tempo(self.params.tempo_bpm);
    }

    pub fn parameters(&self) -> &ProcessingParams {
        &self.params
    }

    pub fn set_mode(&mut self, mode: Mode) {
        tracing::debug!(?mode, "mode changed");
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Set the quantization scale and its root note (clamped to 0-127).
    pub fn set_scale(&mut self, scale: Scale, key_center: i32) {
        self.scale = scale;
        self.key_center = key_center.clamp(0, 127);
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn key_center(&self) -> i32 {
        self.key_center
    }

    /// Clamped to [60, 200] BPM.
    pub fn set_tempo(&mut self, tempo_bpm: f32) {
        self.params.tempo_bpm = tempo_bpm.clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM);
        self.quantizer.set_tempo(tempo_bpm);
    }

    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.quantizer.set_time_signature(time_signature);
    }

    /// Intervals are reduced mod 12, sorted, and deduplicated.
    pub fn set_custom_scale(&mut self, intervals: &[i32]) {
        self.quantizer.set_custom_scale(intervals);
    }

    /// Derive the operating mode from feature toggles: correction and
    /// quantization together select FullAutotune, either alone selects its
    /// dedicated mode, neither selects Bypass.
    pub fn configure_features(
        &mut self,
        enable_correction: bool,
        enable_quantization: bool,
        enable_formants: bool,
    ) {
        self.params.preserve_formants = enable_formants;
        self.shifter.set_preserve_formants(enable_formants);

        self.mode = match (enable_correction, enable_quantization) {
            (true, true) => Mode::FullAutotune,
            (true, false) => Mode::PitchCorrection,
            (false, true) => Mode::Quantization,
            (false, false) => Mode::Bypass,
        };
    }

    // --- introspection --------------------------------------------------

    pub fn performance_metrics(&self) -> PerformanceMetrics {
        self.meter.metrics()
    }

    /// Last published pitch estimate, Hz. Lock-free; readable from any
    /// thread.
    pub fn detected_pitch(&self) -> f32 {
        self.readout.detected_hz()
    }

    pub fn corrected_pitch(&self) -> f32 {
        self.readout.corrected_hz()
    }

    pub fn confidence(&self) -> f32 {
        self.readout.confidence()
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size
    }

    pub fn channels(&self) -> usize {
        self.config.channels
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Clear all stateful components: the detector's smoothing register, the
    /// shifter's phase and envelope, both rings, and the latency history.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.shifter.reset();
        self.input_ring.clear();
        self.output_ring.clear();
        self.meter.reset();
        self.readout.clear();
    }

    /// Recommended low-latency buffer size for a sample rate.
    pub fn recommended_buffer_size(sample_rate: u32) -> usize {
        if sample_rate <= 22_050 {
            128
        } else if sample_rate <= 44_100 {
            256
        } else if sample_rate <= 48_000 {
            512
        } else if sample_rate <= 96_000 {
            1024
        } else {
            2048
        }
    }

    // --- optional ML path -----------------------------------------------

    /// Register the inference runtime used by [`load_model`](Self::load_model).
    pub fn register_ml_backend(&mut self, factory: BackendFactory) {
        self.ml.register_backend(factory);
    }

    /// Attempt to load a model; returns whether the load succeeded. Without
    /// a registered runtime this always returns `false` and the traditional
    /// pipeline is used.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> bool {
        self.ml.load_model(path.as_ref())
    }

    /// Silently stays disabled while no model is loaded.
    pub fn set_ml_processing_enabled(&mut self, enabled: bool) {
        self.ml.set_enabled(enabled);
    }

    pub fn is_ml_processing_enabled(&self) -> bool {
        self.ml.is_enabled()
    }

    /// Human-readable description of the ML state.
    pub fn ml_model_info(&self) -> String {
        self.ml.model_info()
    }
}
