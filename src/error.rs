//! # Error Types
//!
//! This module defines the error types for the chord pad converter.
//!
//! ## Error Types
//! - [`ChordPadsError`] - run-level and per-chord-set failures
//! - [`NoteParseError`] - a single note token that could not be read
//!
//! Note parse errors never escape the renderer: an unreadable token is skipped
//! when computing the interval mask and passed through verbatim into the note
//! string. Only [`ChordPadsError`] reaches the caller.
//!
//! ## Usage
//! ```rust
//! use chordpads::{convert, ChordPadsError, RenderOptions};
//!
//! match convert(r#"{"presets": []}"#, &RenderOptions::default()) {
//!     Err(ChordPadsError::MissingChords) => eprintln!("no chord sets in input"),
//!     Err(e) => eprintln!("Error: {}", e),
//!     Ok(results) => println!("{} chord sets", results.len()),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChordPadsError {
    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document is not valid JSON.
    ///
    /// # Example
    /// ```
    /// # use chordpads::ChordPadsError;
    /// let err = ChordPadsError::InvalidJson("expected value at line 1 column 1".to_string());
    /// assert_eq!(err.to_string(), "Invalid JSON input: expected value at line 1 column 1");
    /// ```
    #[error("Invalid JSON input: {0}")]
    InvalidJson(String),

    /// The input document has no top-level `chords` array.
    #[error("Invalid JSON input: 'chords' array is missing")]
    MissingChords,

    /// One entry of the `chords` array could not be read as a chord set.
    ///
    /// Carries the zero-based position in the input so the entry can be found
    /// even when its id is the broken part.
    ///
    /// # Example
    /// ```
    /// # use chordpads::ChordPadsError;
    /// let err = ChordPadsError::InvalidChordSet {
    ///     index: 3,
    ///     message: "missing field `name`".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid chord set at position 3: missing field `name`");
    /// ```
    #[error("Invalid chord set at position {index}: {message}")]
    InvalidChordSet { index: usize, message: String },

    /// A chord set does not hold exactly twelve pads.
    #[error("Chord set {id} has {found} pads, expected {expected}")]
    PadCount {
        id: u32,
        found: usize,
        expected: usize,
    },

    /// The configuration file is unreadable or holds invalid values.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The tabular source document could not be turned into chord sets.
    #[error("Table extraction failed: {0}")]
    Extract(String),
}

impl ChordPadsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChordPadsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a note token such as `"C#4"` could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteParseError {
    #[error("empty note token")]
    Empty,

    #[error("unknown note name in '{0}'")]
    UnknownName(String),

    #[error("missing or invalid octave in '{0}'")]
    InvalidOctave(String),
}
