//! # Interval Masks
//!
//! Encodes which semitone intervals above a root are present in a chord.
//!
//! ## Bit Layout
//! ```text
//! interval:  1    2    3    4    5    6    7    8    9   10   11
//! bit:       0    1    2    3    4    5    6    7    8    9   10
//! value:     1    2    4    8   16   32   64  128  256  512 1024
//!            m2   M2   m3   M3   P4  TT   P5   m6   M6   m7   M7
//! ```
//! The root itself (interval 0) has no bit. The consuming application
//! expects exactly this layout, so the highest possible mask is 2047.

use crate::note::{parse_note, NoteName};

/// Largest mask value: all eleven non-root intervals present.
pub const MAX_MASK: u16 = 0x07FF;

/// Semitones from `root` up to `pitch_class`, 0 to 11.
pub fn interval_above(root: NoteName, pitch_class: u8) -> u8 {
    (pitch_class + 12 - root.pitch_class()) % 12
}

/// Compute the interval mask of `notes` relative to `root`.
///
/// Unparsable tokens are skipped. Order, octave and duplicates have no effect.
///
/// # Examples
/// ```
/// use chordpads::mask::interval_mask;
/// use chordpads::note::NoteName;
///
/// // C major: major third (bit 3) + fifth (bit 6)
/// assert_eq!(interval_mask(NoteName::C, &["C3", "E3", "G3"]), 72);
/// // C minor: minor third (bit 2) + fifth (bit 6)
/// assert_eq!(interval_mask(NoteName::C, &["C3", "Eb3", "G3"]), 68);
/// ```
pub fn interval_mask<S: AsRef<str>>(root: NoteName, notes: &[S]) -> u16 {
    notes
        .iter()
        .filter_map(|token| parse_note(token.as_ref()).ok())
        .map(|note| interval_above(root, note.pitch_class()))
        .filter(|&interval| interval > 0)
        .fold(0u16, |mask, interval| mask | 1 << (interval - 1))
}

/// Intervals present in `mask`, ascending, in semitones.
pub fn intervals_in_mask(mask: u16) -> Vec<u8> {
    (1..=11u8)
        .filter(|interval| mask & (1 << (interval - 1)) != 0)
        .collect()
}
