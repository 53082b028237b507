//! Root extraction from chord labels like `F#m7`, `Cadd9/E` or `Bbsus4`.

use crate::note::{spelling_prefix, NoteName};

/// Root used when a label does not start with a note name.
pub const FALLBACK_ROOT: NoteName = NoteName::C;

/// Result of reading the root from a chord label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordRoot {
    pub name: NoteName,
    /// `true` when the label had no recognizable root and [`FALLBACK_ROOT`] was used.
    pub fallback: bool,
}

/// Extract the root of a chord label.
///
/// Only the leading spelling matters; quality, extensions and slash bass are
/// ignored. A two-character spelling is preferred over the bare letter.
///
/// # Examples
/// ```
/// use chordpads::chord::analyze_chord_name;
/// use chordpads::note::NoteName;
///
/// assert_eq!(analyze_chord_name("C#m7").name, NoteName::CSharp);
/// assert_eq!(analyze_chord_name("Cadd9/E").name, NoteName::C);
///
/// let root = analyze_chord_name("N.C.");
/// assert_eq!(root.name, NoteName::C);
/// assert!(root.fallback);
/// ```
pub fn analyze_chord_name(label: &str) -> ChordRoot {
    match spelling_prefix(label) {
        Some((name, _)) => ChordRoot {
            name,
            fallback: false,
        },
        None => ChordRoot {
            name: FALLBACK_ROOT,
            fallback: true,
        },
    }
}

/// Root note of a chord label, [`FALLBACK_ROOT`] if there is none.
pub fn chord_root(label: &str) -> NoteName {
    analyze_chord_name(label).name
}
