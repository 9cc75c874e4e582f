//! # Note Module
//!
//! This module maps the 88 keys of a standard piano onto pitch classes and
//! octaves. Key numbers run from 1 (A0) to 88 (C8) and sit 20 below the
//! corresponding MIDI note number.
//!
//! ## Features
//! - 12-tone chromatic pitch classes with combined enharmonic names ("C#/Db")
//! - Key number to (pitch class, octave) conversion and back
//! - Lenient, case-insensitive pitch class parsing
//! - Equal temperament frequency for any key

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of keys on a standard piano.
pub const KEY_COUNT: u8 = 88;

/// Distance between a key number and its MIDI note number.
pub const MIDI_OFFSET: u8 = 20;

/// Key number of A4, the tuning reference.
const A4_KEY: u8 = 49;

/// One of the 12 chromatic pitch classes, ordered from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order starting from C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Display name, with both spellings for the black keys.
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#/Db",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#/Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#/Gb",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#/Ab",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#/Bb",
            PitchClass::B => "B",
        }
    }

    /// Semitones above C (0-11).
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> PitchClass {
        Self::ALL[(index % 12) as usize]
    }

    pub fn is_black(self) -> bool {
        self.name().contains('/')
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name any pitch class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pitch class: {0:?}")]
pub struct ParsePitchClassError(pub String);

/// Lowercase spelling -> pitch class, covering the combined name and
/// each enharmonic half ("c#/db", "db/c#", "c#", "db").
static NAME_MAP: Lazy<BTreeMap<String, PitchClass>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    for pitch in PitchClass::ALL {
        let name = pitch.name().to_ascii_lowercase();
        let spellings: Vec<&str> = name.split('/').collect();
        if let &[sharp, flat] = spellings.as_slice() {
            map.insert(format!("{flat}/{sharp}"), pitch);
        }
        for spelling in &spellings {
            map.insert(spelling.to_string(), pitch);
        }
        map.insert(name, pitch);
    }
    map
});

impl FromStr for PitchClass {
    type Err = ParsePitchClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        NAME_MAP
            .get(&normalized)
            .copied()
            .ok_or_else(|| ParsePitchClassError(s.to_string()))
    }
}

/// A single piano key, identified by its key number (1-88).
///
/// Name and octave are derived from the key number: key 1 is A0, key 4 is
/// C1 and key 88 is C8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Note {
    key_number: u8,
}

impl Note {
    /// Builds a note from a key number, or `None` outside 1-88.
    pub fn from_key_number(key_number: u8) -> Option<Note> {
        (1..=KEY_COUNT)
            .contains(&key_number)
            .then_some(Note { key_number })
    }

    /// Finds the key for a pitch class in a given octave.
    ///
    /// Returns `None` when the pair falls outside A0..=C8, so octave 0 only
    /// holds A, A#/Bb and B, and octave 8 only holds C.
    pub fn from_name_and_octave(name: PitchClass, octave: u8) -> Option<Note> {
        let key = octave as i32 * 12 + name.index() as i32 - 8;
        u8::try_from(key).ok().and_then(Note::from_key_number)
    }

    /// Every key on the piano, lowest first.
    pub fn all() -> impl Iterator<Item = Note> {
        (1..=KEY_COUNT).map(|key_number| Note { key_number })
    }

    pub fn key_number(self) -> u8 {
        self.key_number
    }

    pub fn name(self) -> PitchClass {
        // The chromatic cycle is offset by 8 so that key 1 lands on A.
        PitchClass::from_index(self.key_number + 8)
    }

    /// Octave number (0-8). Octaves change at C.
    pub fn octave(self) -> u8 {
        (self.key_number + 8) / 12
    }

    pub fn midi_number(self) -> u8 {
        self.key_number + MIDI_OFFSET
    }

    /// Equal temperament frequency in Hz for the given A4 reference.
    ///
    /// The formula is f = a4 * 2^(n/12), where n is the number of semitones
    /// away from A4 (key 49).
    pub fn frequency(self, a4: f32) -> f32 {
        a4 * 2.0_f32.powf((self.key_number as f32 - A4_KEY as f32) / 12.0)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.octave())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_edges() {
        let lowest = Note::from_key_number(1).unwrap();
        assert_eq!((lowest.name(), lowest.octave()), (PitchClass::A, 0));

        let highest = Note::from_key_number(88).unwrap();
        assert_eq!((highest.name(), highest.octave()), (PitchClass::C, 8));

        assert!(Note::from_key_number(0).is_none());
        assert!(Note::from_key_number(89).is_none());
    }

    #[test]
    fn octave_changes_at_c() {
        let b0 = Note::from_key_number(3).unwrap();
        let c1 = Note::from_key_number(4).unwrap();
        assert_eq!((b0.name(), b0.octave()), (PitchClass::B, 0));
        assert_eq!((c1.name(), c1.octave()), (PitchClass::C, 1));

        let middle_c = Note::from_key_number(40).unwrap();
        assert_eq!((middle_c.name(), middle_c.octave()), (PitchClass::C, 4));
        assert_eq!(middle_c.midi_number(), 60);
    }

    #[test]
    fn name_and_octave_round_trip_every_key() {
        for note in Note::all() {
            assert_eq!(Note::from_name_and_octave(note.name(), note.octave()), Some(note));
        }
        assert_eq!(Note::all().count(), KEY_COUNT as usize);
    }

    #[test]
    fn boundary_octaves() {
        assert!(Note::from_name_and_octave(PitchClass::A, 0).is_some());
        assert!(Note::from_name_and_octave(PitchClass::ASharp, 0).is_some());
        assert!(Note::from_name_and_octave(PitchClass::B, 0).is_some());
        assert!(Note::from_name_and_octave(PitchClass::GSharp, 0).is_none());
        assert!(Note::from_name_and_octave(PitchClass::C, 0).is_none());
        assert!(Note::from_name_and_octave(PitchClass::C, 8).is_some());
        assert!(Note::from_name_and_octave(PitchClass::CSharp, 8).is_none());
        assert!(Note::from_name_and_octave(PitchClass::D, 8).is_none());
        assert!(Note::from_name_and_octave(PitchClass::C, 9).is_none());
    }

    #[test]
    fn a4_is_reference_frequency() {
        let a4 = Note::from_name_and_octave(PitchClass::A, 4).unwrap();
        assert_eq!(a4.key_number(), 49);
        assert!((a4.frequency(440.0) - 440.0).abs() < 1e-3);

        let a0 = Note::from_key_number(1).unwrap();
        assert!((a0.frequency(440.0) - 27.5).abs() < 1e-3);
    }

    #[test]
    fn parses_pitch_class_spellings() {
        assert_eq!("C#/Db".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("c#".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("DB".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("bb/a#".parse::<PitchClass>(), Ok(PitchClass::ASharp));
        assert_eq!(" a ".parse::<PitchClass>(), Ok(PitchClass::A));
        assert!("H".parse::<PitchClass>().is_err());
        assert!("".parse::<PitchClass>().is_err());
    }

    #[test]
    fn display_matches_answer_format() {
        let note = Note::from_key_number(2).unwrap();
        assert_eq!(note.to_string(), "A#/Bb 0");
        assert!(note.name().is_black());
        assert!(!PitchClass::E.is_black());
    }
}
