use crate::generalized::error::GeneralizedError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

pub const NOTES_IN_OCTAVE: i32 = 12;
/// MIDI number of A0. AKAI note bytes share the same bias.
pub const MIDI_A0: i32 = 21;

const NOTE_NAMES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

lazy_static! {
    static ref MIDI_NOTE_REGEX: Regex = Regex::new(r"^([A-G])(#?)(\d)").unwrap();
}

/// A note named from A0 upwards, octaves starting at A (so C0 is MIDI 24 and C4 is 72).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MidiNote(i32);

impl MidiNote {
    pub const fn from_midi_byte(byte: i32) -> Self {
        Self(byte)
    }

    pub const fn from_akai_byte(byte: i32) -> Self {
        Self(byte)
    }

    pub const fn to_midi_byte(self) -> i32 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self(self.0 + semitones)
    }

    pub fn octave(self) -> i32 {
        (self.0 - MIDI_A0).div_euclid(NOTES_IN_OCTAVE)
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[(self.0 - MIDI_A0).rem_euclid(NOTES_IN_OCTAVE) as usize]
    }
}

impl Default for MidiNote {
    /// C4
    fn default() -> Self {
        Self(72)
    }
}

impl fmt::Display for MidiNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave())
    }
}

impl FromStr for MidiNote {
    type Err = GeneralizedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let captures = MIDI_NOTE_REGEX
            .captures(&upper)
            .ok_or_else(|| GeneralizedError::InvalidMidiNote(s.to_string()))?;

        let degree = match &captures[1] {
            "A" => 0,
            "B" => 2,
            "C" => 3,
            "D" => 5,
            "E" => 7,
            "F" => 8,
            _ => 10,
        };
        let sharp = if captures[2].is_empty() { 0 } else { 1 };
        let octave: i32 = captures[3]
            .parse()
            .map_err(|_| GeneralizedError::InvalidMidiNote(s.to_string()))?;

        Ok(Self(MIDI_A0 + degree + sharp + NOTES_IN_OCTAVE * octave))
    }
}
