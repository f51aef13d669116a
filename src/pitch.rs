use crate::{dsp::math::lerp, SAMPLE_RATE};

pub const NOTE_TABLE_SIZE: usize = 152;

/// Highest note in the table. Notes above this clamp to it.
pub const MAX_NOTE: u8 = (NOTE_TABLE_SIZE - 1) as u8;

/// Frequency ceiling, just under Nyquist at 48 kHz.
pub const NOTE_MAX_HZ: f32 = 23_679.643;

const FINE_SCALE: f32 = 1.0 / 255.0;

/// Host pitch word: note number in the high byte, fine offset toward the
/// next note in the low byte (0..=255).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub note: u8,
    pub fine: u8,
}

impl Pitch {
    pub const fn new(note: u8, fine: u8) -> Self {
        Self { note, fine }
    }

    pub const fn to_word(self) -> u16 {
        ((self.note as u16) << 8) | self.fine as u16
    }
}

impl From<u16> for Pitch {
    fn from(word: u16) -> Self {
        Self {
            note: (word >> 8) as u8,
            fine: (word & 0xFF) as u8,
        }
    }
}

/// Maps a note plus fine offset to a per-sample phase increment.
///
/// Implementations must be pure and deterministic, non-decreasing in `note`
/// for a fixed `fine`, and continuous across note boundaries: `fine = 255`
/// on note `n` lands on `fine = 0` of note `n + 1`.
pub trait PitchMap {
    /// Normalized frequency in cycles/sample.
    fn frequency_for_note(&self, note: u8, fine: u8) -> f32;

    /// Sample rate the increments are computed for.
    fn sample_rate(&self) -> f32 {
        SAMPLE_RATE
    }

    fn frequency_for_pitch(&self, pitch: Pitch) -> f32 {
        self.frequency_for_note(pitch.note, pitch.fine)
    }
}

/// 12-tone equal temperament, A4 = note 69 = 440 Hz.
#[derive(Debug, Clone)]
pub struct EqualTemperament {
    note_hz: [f32; NOTE_TABLE_SIZE],
    sample_rate: f32,
}

impl EqualTemperament {
    pub fn new() -> Self {
        Self::with_sample_rate(SAMPLE_RATE)
    }

    pub fn with_sample_rate(sample_rate: f32) -> Self {
        let mut note_hz = [0.0; NOTE_TABLE_SIZE];
        for (note, hz) in note_hz.iter_mut().enumerate() {
            *hz = midi_note_to_freq(note as f32);
        }
        Self {
            note_hz,
            sample_rate,
        }
    }

    /// Table frequency for `note`, clamped to the top of the table.
    pub fn note_hz(&self, note: u8) -> f32 {
        self.note_hz[note.min(MAX_NOTE) as usize]
    }
}

impl Default for EqualTemperament {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchMap for EqualTemperament {
    fn frequency_for_note(&self, note: u8, fine: u8) -> f32 {
        let f0 = self.note_hz(note);
        let f1 = self.note_hz(note.saturating_add(1));
        let hz = lerp(fine as f32 * FINE_SCALE, f0, f1).min(NOTE_MAX_HZ);
        hz / self.sample_rate
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}
