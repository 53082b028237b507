//! # Chord Library Model
//!
//! Types for the canonical JSON document shared by the converter and the
//! table extractor.
//!
//! ```text
//! ChordLibrary
//!   └── chords: Vec<ChordSet>
//!         ├── id: u32          (artifact numbering)
//!         ├── name: String
//!         └── pads: Vec<Pad>   (exactly PAD_COUNT)
//!               ├── chordName: String
//!               ├── notes: Vec<String>   (low to high, as authored)
//!               └── key: Option<String>  (layout label, C .. B)
//! ```
//!
//! Ids are accepted both as JSON integers and as strings holding an integer,
//! since older exports wrote the table's id cell as text.

use serde::{Deserialize, Deserializer, Serialize};

/// Pads per chord set.
pub const PAD_COUNT: usize = 12;

/// Layout labels for the twelve pads, one per semitone.
pub const PAD_KEYS: [&str; PAD_COUNT] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChordLibrary {
    pub chords: Vec<ChordSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSet {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    pub name: String,
    pub pads: Vec<Pad>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pad {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub chord_name: String,
}

impl Pad {
    pub fn new(chord_name: &str, notes: &[&str]) -> Self {
        Self {
            key: None,
            notes: notes.iter().map(|n| n.to_string()).collect(),
            chord_name: chord_name.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u32),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("id must be a non-negative integer, got \"{}\"", text))
        }),
    }
}
