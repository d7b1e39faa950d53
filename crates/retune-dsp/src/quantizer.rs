//! Musical pitch and timing quantization.

use retune_core::Note;

/// Musical scales for pitch quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Scale {
    /// All 12 semitones
    Chromatic,
    /// Major scale (Ionian)
    #[default]
    Major,
    /// Natural minor scale (Aeolian)
    Minor,
    /// Major pentatonic
    Pentatonic,
    Blues,
    Dorian,
    Mixolydian,
    /// User-defined intervals, see [`Quantizer::set_custom_scale`]
    Custom,
}

/// Rhythmic grid resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum GridResolution {
    Quarter,
    Eighth,
    Sixteenth,
    /// Triplet subdivision of the beat
    Triplet,
    /// Dotted quarter
    Dotted,
}

/// Time signature for rhythmic quantization.
///
/// In 6/8 and 12/8 the eighth note gets the beat, halving the samples per
/// beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum TimeSignature {
    #[default]
    FourFour,
    ThreeFour,
    TwoFour,
    SixEight,
    TwelveEight,
}

pub const MIN_TEMPO_BPM: f32 = 60.0;
pub const MAX_TEMPO_BPM: f32 = 200.0;

// Built-in scale interval tables, semitones from the root. Shared immutable
// data; only the custom scale is per-instance state.
const CHROMATIC_INTERVALS: &[i32] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
const MAJOR_INTERVALS: &[i32] = &[0, 2, 4, 5, 7, 9, 11];
const MINOR_INTERVALS: &[i32] = &[0, 2, 3, 5, 7, 8, 10];
const PENTATONIC_INTERVALS: &[i32] = &[0, 2, 4, 7, 9];
const BLUES_INTERVALS: &[i32] = &[0, 3, 5, 6, 7, 10];
const DORIAN_INTERVALS: &[i32] = &[0, 2, 3, 5, 7, 9, 10];
const MIXOLYDIAN_INTERVALS: &[i32] = &[0, 2, 4, 5, 7, 9, 10];

/// Maps frequencies to the nearest pitch of a musical scale and time
/// positions to the nearest point of a rhythmic grid.
pub struct Quantizer {
    sample_rate: u32,
    tempo: f32,
    time_signature: TimeSignature,
    custom_intervals: Vec<i32>,
    samples_per_beat: f32,
}

impl Quantizer {
    pub fn new(sample_rate: u32, tempo: f32) -> Self {
        let mut quantizer = Self {
            sample_rate,
            tempo: tempo.clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM),
            time_signature: TimeSignature::default(),
            custom_intervals: Vec::new(),
            samples_per_beat: 0.0,
        };
        quantizer.update_timing();
        quantizer
    }

    /// Pull `input_hz` toward the nearest pitch of `scale` rooted at
    /// `key_center`, blending by `strength` in MIDI space. Non-positive
    /// frequencies and strengths pass through unchanged.
    pub fn quantize_pitch(
        &self,
        input_hz: f32,
        scale: Scale,
        key_center: i32,
        strength: f32,
    ) -> f32 {
        if input_hz <= 0.0 || strength <= 0.0 {
            return input_hz;
        }

        let input_midi = Self::frequency_to_midi(input_hz);
        let quantized_midi = self.nearest_scale_note(input_midi, scale, key_center);
        let result_midi = input_midi + strength * (quantized_midi - input_midi);

        Self::midi_to_frequency(result_midi)
    }

    /// Nearest in-scale note for `input_hz`, with the cents deviation of the
    /// input from it: `input = quantized · 2^(cents/1200)`.
    pub fn nearest_note(&self, input_hz: f32, scale: Scale, key_center: i32) -> Note {
        if input_hz <= 0.0 {
            return Note::new(0.0, 0, 0.0);
        }

        let input_midi = Self::frequency_to_midi(input_hz);
        let quantized_midi = self.nearest_scale_note(input_midi, scale, key_center);
        let quantized_hz = Self::midi_to_frequency(quantized_midi);
        let cents = 1200.0 * (input_hz / quantized_hz).log2();

        Note::new(quantized_hz, quantized_midi as i32, cents)
    }

    /// Pull a sample position toward the nearest grid point, blending by
    /// `strength`.
    pub fn quantize_timing(&self, time_samples: u32, grid: GridResolution, strength: f32) -> u32 {
        if strength <= 0.0 {
            return time_samples;
        }

        let samples_per_grid = self.samples_per_grid(grid);
        let grid_position = time_samples as f32 / samples_per_grid;
        let nearest = grid_position.round();
        let quantized = grid_position + strength * (nearest - grid_position);

        (quantized * samples_per_grid) as u32
    }

    /// Clamped to [60, 200] BPM.
    pub fn set_tempo(&mut self, tempo: f32) {
        self.tempo = tempo.clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM);
        self.update_timing();
    }

    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature;
        self.update_timing();
    }

    /// Store a custom interval set: reduced mod 12, sorted ascending,
    /// duplicates removed.
    pub fn set_custom_scale(&mut self, intervals: &[i32]) {
        self.custom_intervals = intervals.iter().map(|i| i.rem_euclid(12)).collect();
        self.custom_intervals.sort_unstable();
        self.custom_intervals.dedup();
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    /// MIDI note number for a frequency; 69 = A4 = 440 Hz. Returns 0 for
    /// non-positive input.
    pub fn frequency_to_midi(frequency: f32) -> f32 {
        if frequency <= 0.0 {
            return 0.0;
        }
        69.0 + 12.0 * (frequency / 440.0).log2()
    }

    pub fn midi_to_frequency(midi_note: f32) -> f32 {
        440.0 * 2.0f32.powf((midi_note - 69.0) / 12.0)
    }

    /// Fold `midi` into the octave above the key center and pick the closest
    /// interval, considering each interval in this octave and the next. Ties
    /// go to the first candidate in scan order. An empty interval set (an
    /// unset custom scale) quantizes to the input itself.
    fn nearest_scale_note(&self, midi: f32, scale: Scale, key_center: i32) -> f32 {
        let intervals = self.intervals(scale);
        if intervals.is_empty() {
            return midi;
        }

        let relative = midi - key_center as f32;
        let octave = (relative / 12.0).floor();
        let in_octave = relative - octave * 12.0;

        let mut nearest = intervals[0] as f32;
        let mut min_distance = (in_octave - nearest).abs();
        for &interval in intervals {
            let distance = (in_octave - interval as f32).abs();
            if distance < min_distance {
                min_distance = distance;
                nearest = interval as f32;
            }

            let upper = interval as f32 + 12.0;
            let upper_distance = (in_octave - upper).abs();
            if upper_distance < min_distance {
                min_distance = upper_distance;
                nearest = upper;
            }
        }

        key_center as f32 + octave * 12.0 + nearest
    }

    fn intervals(&self, scale: Scale) -> &[i32] {
        match scale {
            Scale::Chromatic => CHROMATIC_INTERVALS,
            Scale::Major => MAJOR_INTERVALS,
            Scale::Minor => MINOR_INTERVALS,
            Scale::Pentatonic => PENTATONIC_INTERVALS,
            Scale::Blues => BLUES_INTERVALS,
            Scale::Dorian => DORIAN_INTERVALS,
            Scale::Mixolydian => MIXOLYDIAN_INTERVALS,
            Scale::Custom => &self.custom_intervals,
        }
    }

    fn update_timing(&mut self) {
        let mut samples_per_beat = 60.0 / self.tempo * self.sample_rate as f32;
        if matches!(
            self.time_signature,
            TimeSignature::SixEight | TimeSignature::TwelveEight
        ) {
            // The eighth note gets the beat
            samples_per_beat /= 2.0;
        }
        self.samples_per_beat = samples_per_beat;
    }

    fn samples_per_grid(&self, grid: GridResolution) -> f32 {
        match grid {
            GridResolution::Quarter => self.samples_per_beat,
            GridResolution::Eighth => self.samples_per_beat / 2.0,
            GridResolution::Sixteenth => self.samples_per_beat / 4.0,
            GridResolution::Triplet => self.samples_per_beat / 3.0,
            GridResolution::Dotted => self.samples_per_beat * 1.5,
        }
    }
}
