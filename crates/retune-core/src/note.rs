//! Musical note representation.

/// A musical note: frequency, MIDI number, and cents deviation.
///
/// `midi_note` is the nearest equal-temperament pitch index (69 = A4 =
/// 440 Hz); `cents` is the deviation of the source frequency from the
/// quantized one, in hundredths of a semitone.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Note {
    /// Hz
    pub frequency: f32,
    /// MIDI note number (0-127)
    pub midi_note: i32,
    /// Cents deviation from equal temperament, in [-1200, 1200]
    pub cents: f32,
}

impl Note {
    pub fn new(frequency: f32, midi_note: i32, cents: f32) -> Self {
        Self {
            frequency,
            midi_note,
            cents,
        }
    }

    /// Sharp notation (e.g. "A4", "C#5").
    pub fn name(&self) -> String {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        self.format_name(&NAMES)
    }

    /// Flat notation (e.g. "A4", "Db5").
    pub fn name_flat(&self) -> String {
        const NAMES: [&str; 12] = [
            "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
        ];
        self.format_name(&NAMES)
    }

    fn format_name(&self, names: &[&str; 12]) -> String {
        let note = self.midi_note.clamp(0, 127);
        let name = names[(note % 12) as usize];
        let octave = note / 12 - 1;
        format!("{}{}", name, octave)
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new(440.0, 69, 0.0)
    }
}
