//! Lock-free pitch readout shared with observer threads.

use atomic_float::AtomicF32;
use core::sync::atomic::Ordering;

/// Latest pitch estimate published by the processing thread.
///
/// The engine stores all three values once per block with Release ordering;
/// any number of observer threads (UI meters, tuner displays) read them with
/// Acquire. Cache-line aligned so the readout does not share a line with the
/// engine's mutable state.
#[derive(Debug)]
#[repr(align(64))]
pub struct PitchReadout {
    detected_hz: AtomicF32,
    corrected_hz: AtomicF32,
    confidence: AtomicF32,
}

impl PitchReadout {
    pub fn new() -> Self {
        Self {
            detected_hz: AtomicF32::new(0.0),
            corrected_hz: AtomicF32::new(0.0),
            confidence: AtomicF32::new(0.0),
        }
    }

    /// Publish the outcome of one processed block.
    pub fn publish(&self, detected_hz: f32, corrected_hz: f32, confidence: f32) {
        self.detected_hz.store(detected_hz, Ordering::Release);
        self.corrected_hz.store(corrected_hz, Ordering::Release);
        self.confidence.store(confidence, Ordering::Release);
    }

    /// Hz, 0.0 while unvoiced.
    pub fn detected_hz(&self) -> f32 {
        self.detected_hz.load(Ordering::Acquire)
    }

    /// Hz, the target the last block was shifted toward.
    pub fn corrected_hz(&self) -> f32 {
        self.corrected_hz.load(Ordering::Acquire)
    }

    /// 0.0..1.0
    pub fn confidence(&self) -> f32 {
        self.confidence.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.publish(0.0, 0.0, 0.0);
    }
}

impl Default for PitchReadout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unvoiced() {
        let readout = PitchReadout::new();
        assert_eq!(readout.detected_hz(), 0.0);
        assert_eq!(readout.corrected_hz(), 0.0);
        assert_eq!(readout.confidence(), 0.0);
    }

    #[test]
    fn test_publish_and_clear() {
        let readout = PitchReadout::new();
        readout.publish(438.2, 440.0, 0.9);
        assert_eq!(readout.detected_hz(), 438.2);
        assert_eq!(readout.corrected_hz(), 440.0);
        assert_eq!(readout.confidence(), 0.9);

        readout.clear();
        assert_eq!(readout.detected_hz(), 0.0);
        assert_eq!(readout.confidence(), 0.0);
    }

    #[test]
    fn test_readable_from_another_thread() {
        let readout = std::sync::Arc::new(PitchReadout::new());
        readout.publish(261.6, 261.63, 0.8);

        let observer = {
            let readout = std::sync::Arc::clone(&readout);
            std::thread::spawn(move || readout.detected_hz())
        };
        assert_eq!(observer.join().unwrap(), 261.6);
    }
}
