//! # Note Parsing
//!
//! Reads note tokens like `C3`, `F#4`, `Bb-1` into [`ParsedNote`] values.
//!
//! ## Token Grammar
//! ```text
//! token   = name octave
//! name    = letter [ "#" | "b" ]      (one of the 17 spellings below)
//! octave  = [ "-" ] digit { digit }
//! ```
//!
//! ## Pitch Classes
//! Enharmonic spellings share a pitch class:
//! ```text
//! C=0  C#/Db=1  D=2  D#/Eb=3  E=4  F=5  F#/Gb=6  G=7  G#/Ab=8  A=9  A#/Bb=10  B=11
//! ```
//! `E#`, `Fb`, `B#` and `Cb` are not recognized spellings.
//!
//! Octaves are limited to `-MAX_OCTAVE..=MAX_OCTAVE` so that
//! [`ParsedNote::absolute_pitch`] always fits in an `i32`.

use crate::error::NoteParseError;
use std::fmt;
use std::str::FromStr;

/// Largest octave magnitude a note may carry.
pub const MAX_OCTAVE: i32 = (i32::MAX - 11) / 12 - 1;

/// One of the 17 recognized note spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteName {
    #[default]
    C,
    CSharp,
    DFlat,
    D,
    DSharp,
    EFlat,
    E,
    F,
    FSharp,
    GFlat,
    G,
    GSharp,
    AFlat,
    A,
    ASharp,
    BFlat,
    B,
}

/// Spelling table. Order follows the chromatic scale.
static SPELLINGS: [(NoteName, &str, u8); 17] = [
    (NoteName::C, "C", 0),
    (NoteName::CSharp, "C#", 1),
    (NoteName::DFlat, "Db", 1),
    (NoteName::D, "D", 2),
    (NoteName::DSharp, "D#", 3),
    (NoteName::EFlat, "Eb", 3),
    (NoteName::E, "E", 4),
    (NoteName::F, "F", 5),
    (NoteName::FSharp, "F#", 6),
    (NoteName::GFlat, "Gb", 6),
    (NoteName::G, "G", 7),
    (NoteName::GSharp, "G#", 8),
    (NoteName::AFlat, "Ab", 8),
    (NoteName::A, "A", 9),
    (NoteName::ASharp, "A#", 10),
    (NoteName::BFlat, "Bb", 10),
    (NoteName::B, "B", 11),
];

impl NoteName {
    /// All recognized spellings in chromatic order.
    pub fn all() -> impl Iterator<Item = NoteName> {
        SPELLINGS.iter().map(|(name, _, _)| *name)
    }

    /// Look up a spelling such as `"C#"` or `"Eb"`. Case-sensitive.
    pub fn from_str(s: &str) -> Option<Self> {
        SPELLINGS
            .iter()
            .find(|(_, spelling, _)| *spelling == s)
            .map(|(name, _, _)| *name)
    }

    pub fn as_str(self) -> &'static str {
        self.entry().1
    }

    /// Semitones above C, 0 to 11.
    pub fn pitch_class(self) -> u8 {
        self.entry().2
    }

    fn entry(self) -> &'static (NoteName, &'static str, u8) {
        // Every variant has exactly one table row.
        SPELLINGS
            .iter()
            .find(|(name, _, _)| *name == self)
            .unwrap_or(&SPELLINGS[0])
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length in bytes of the longest recognized spelling at the start of `s`.
///
/// Tries the letter plus accidental first, then the bare letter, so `"C#m"`
/// yields the two-byte `C#` and `"Cbm"` (not a recognized spelling) yields `C`.
pub(crate) fn spelling_prefix(s: &str) -> Option<(NoteName, usize)> {
    let bytes = s.as_bytes();
    if !matches!(bytes.first(), Some(b'A'..=b'G')) {
        return None;
    }
    if matches!(bytes.get(1), Some(b'#') | Some(b'b')) {
        if let Some(name) = NoteName::from_str(&s[..2]) {
            return Some((name, 2));
        }
    }
    NoteName::from_str(&s[..1]).map(|name| (name, 1))
}

/// A note token split into spelling and octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedNote {
    pub name: NoteName,
    pub octave: i32,
}

impl ParsedNote {
    pub fn new(name: NoteName, octave: i32) -> Self {
        Self { name, octave }
    }

    pub fn pitch_class(&self) -> u8 {
        self.name.pitch_class()
    }

    /// MIDI-style pitch number: `(octave + 1) * 12 + pitch_class`, so C4 = 60.
    pub fn absolute_pitch(&self) -> i32 {
        (self.octave + 1) * 12 + i32::from(self.pitch_class())
    }

    /// The same spelling moved by whole octaves, or `None` if the new octave
    /// is outside `-MAX_OCTAVE..=MAX_OCTAVE`.
    pub fn shifted(&self, octaves: i32) -> Option<Self> {
        self.octave
            .checked_add(octaves)
            .filter(|octave| (-MAX_OCTAVE..=MAX_OCTAVE).contains(octave))
            .map(|octave| Self {
                name: self.name,
                octave,
            })
    }
}

impl fmt::Display for ParsedNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

impl FromStr for ParsedNote {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_note(s)
    }
}

/// Parse a note token such as `"Eb3"`.
///
/// # Examples
/// ```
/// use chordpads::note::{parse_note, NoteName};
///
/// let note = parse_note("Eb3").unwrap();
/// assert_eq!(note.name, NoteName::EFlat);
/// assert_eq!(note.octave, 3);
/// assert_eq!(note.pitch_class(), 3);
/// assert_eq!(note.absolute_pitch(), 51);
///
/// assert!(parse_note("H3").is_err());
/// assert!(parse_note("C").is_err());
/// ```
pub fn parse_note(token: &str) -> Result<ParsedNote, NoteParseError> {
    if token.is_empty() {
        return Err(NoteParseError::Empty);
    }

    let (name, len) = match spelling_prefix(token) {
        Some(found) => found,
        None => return Err(NoteParseError::UnknownName(token.to_string())),
    };

    // A rejected accidental ("E#4") would otherwise leave "#4" as the octave
    // and report the wrong cause.
    let rest = &token[len..];
    if rest.starts_with('#') || rest.starts_with('b') {
        return Err(NoteParseError::UnknownName(token.to_string()));
    }

    let digits = rest.strip_prefix('-').unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NoteParseError::InvalidOctave(token.to_string()));
    }

    let octave = rest
        .parse::<i32>()
        .ok()
        .filter(|octave| (-MAX_OCTAVE..=MAX_OCTAVE).contains(octave))
        .ok_or_else(|| NoteParseError::InvalidOctave(token.to_string()))?;

    Ok(ParsedNote { name, octave })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_table() {
        let expected = [
            ("C", 0),
            ("C#", 1),
            ("Db", 1),
            ("D", 2),
            ("D#", 3),
            ("Eb", 3),
            ("E", 4),
            ("F", 5),
            ("F#", 6),
            ("Gb", 6),
            ("G", 7),
            ("G#", 8),
            ("Ab", 8),
            ("A", 9),
            ("A#", 10),
            ("Bb", 10),
            ("B", 11),
        ];
        for (spelling, pc) in expected {
            let name = NoteName::from_str(spelling).unwrap();
            assert_eq!(name.pitch_class(), pc, "pitch class of {}", spelling);
            assert_eq!(name.as_str(), spelling);
        }
        assert_eq!(NoteName::all().count(), 17);
    }

    #[test]
    fn test_unrecognized_spellings() {
        for spelling in ["E#", "Fb", "B#", "Cb", "H", "c#", ""] {
            assert_eq!(NoteName::from_str(spelling), None, "{:?}", spelling);
        }
    }

    #[test]
    fn test_parse_basic_notes() {
        assert_eq!(parse_note("C3"), Ok(ParsedNote::new(NoteName::C, 3)));
        assert_eq!(parse_note("F#4"), Ok(ParsedNote::new(NoteName::FSharp, 4)));
        assert_eq!(parse_note("Bb2"), Ok(ParsedNote::new(NoteName::BFlat, 2)));
        assert_eq!(parse_note("A10"), Ok(ParsedNote::new(NoteName::A, 10)));
    }

    #[test]
    fn test_parse_negative_octave() {
        let note = parse_note("C-1").unwrap();
        assert_eq!(note.octave, -1);
        assert_eq!(note.absolute_pitch(), 0);

        let note = parse_note("Db-2").unwrap();
        assert_eq!(note.name, NoteName::DFlat);
        assert_eq!(note.octave, -2);
    }

    #[test]
    fn test_absolute_pitch() {
        assert_eq!(parse_note("C4").unwrap().absolute_pitch(), 60);
        assert_eq!(parse_note("A4").unwrap().absolute_pitch(), 69);
        assert_eq!(parse_note("B3").unwrap().absolute_pitch(), 59);
        assert_eq!(
            parse_note("C#4").unwrap().absolute_pitch(),
            parse_note("Db4").unwrap().absolute_pitch()
        );
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(parse_note(""), Err(NoteParseError::Empty));
        assert_eq!(
            parse_note("H3"),
            Err(NoteParseError::UnknownName("H3".to_string()))
        );
        assert_eq!(
            parse_note("E#4"),
            Err(NoteParseError::UnknownName("E#4".to_string()))
        );
        assert_eq!(
            parse_note("C"),
            Err(NoteParseError::InvalidOctave("C".to_string()))
        );
        assert_eq!(
            parse_note("C3x"),
            Err(NoteParseError::InvalidOctave("C3x".to_string()))
        );
        assert_eq!(
            parse_note("C-"),
            Err(NoteParseError::InvalidOctave("C-".to_string()))
        );
        assert_eq!(
            parse_note("C+3"),
            Err(NoteParseError::InvalidOctave("C+3".to_string()))
        );
        assert!(parse_note("C99999999999").is_err());
        assert!(parse_note(" C3").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for token in ["C3", "C#4", "Eb-1", "G10", "Ab0"] {
            let note: ParsedNote = token.parse().unwrap();
            assert_eq!(note.to_string(), token);
        }
    }

    #[test]
    fn test_shifted() {
        let note = parse_note("G3").unwrap();
        assert_eq!(note.shifted(-2).unwrap().to_string(), "G1");
        assert_eq!(note.shifted(0), Some(note));
        assert_eq!(note.shifted(1).unwrap().pitch_class(), note.pitch_class());
    }

    #[test]
    fn test_shifted_out_of_range() {
        let top = ParsedNote::new(NoteName::C, MAX_OCTAVE);
        assert_eq!(top.shifted(1), None);
        assert_eq!(top.shifted(i32::MAX), None);
        assert_eq!(top.shifted(-1).map(|n| n.octave), Some(MAX_OCTAVE - 1));

        let bottom = ParsedNote::new(NoteName::B, -MAX_OCTAVE);
        assert_eq!(bottom.shifted(-1), None);
        assert_eq!(bottom.shifted(i32::MIN), None);
    }

    #[test]
    fn test_octave_limit() {
        let top = parse_note(&format!("B{}", MAX_OCTAVE)).unwrap();
        assert_eq!(
            i64::from(top.absolute_pitch()),
            (i64::from(MAX_OCTAVE) + 1) * 12 + 11
        );
        let bottom = parse_note(&format!("C-{}", MAX_OCTAVE)).unwrap();
        assert_eq!(
            i64::from(bottom.absolute_pitch()),
            (1 - i64::from(MAX_OCTAVE)) * 12
        );

        for token in [
            format!("C{}", MAX_OCTAVE + 1),
            format!("C-{}", MAX_OCTAVE + 1),
            "C200000000".to_string(),
            "C2147483647".to_string(),
            "C-2147483648".to_string(),
        ] {
            assert_eq!(
                parse_note(&token),
                Err(NoteParseError::InvalidOctave(token.clone()))
            );
        }
    }

    #[test]
    fn test_spelling_prefix() {
        assert_eq!(spelling_prefix("C#m7"), Some((NoteName::CSharp, 2)));
        assert_eq!(spelling_prefix("Bbmaj7"), Some((NoteName::BFlat, 2)));
        assert_eq!(spelling_prefix("Cadd9/E"), Some((NoteName::C, 1)));
        assert_eq!(spelling_prefix("Cbm"), Some((NoteName::C, 1)));
        assert_eq!(spelling_prefix("xC"), None);
        assert_eq!(spelling_prefix(""), None);
    }
}
