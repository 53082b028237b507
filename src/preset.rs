//! # Chord Pad Preset Rendering
//!
//! Turns one [`ChordSet`] into a `.chordpads` document.
//!
//! ## Document Layout
//! ```text
//! <chordpads>
//!   <rootObjects>            two roots: pad data and metadata
//!   <obj Attributes>         header attributes, then one block per pad
//!   <obj Attributes>         MediaType marker
//! </chordpads>
//! ```
//!
//! ## Per-Pad Attributes (pad `i`, player `j` = 1, 2)
//! - `Mask{i}`   interval mask, see [`crate::mask`]
//! - `Key{i}`    root pitch class
//! - `Bass{i}`   always 0, pads are written in root position
//! - `orgType{i}`, `ALock{i}`, `Locked{i}`
//! - `VIndex{i}{j}`, `TIndex{i}{j}`, `Notes{i}{j}` (note string, same for both players)
//!
//! Rendering is pure: the same chord set always produces the same bytes.

use crate::chord::analyze_chord_name;
use crate::mask::interval_mask;
use crate::model::{ChordSet, Pad, PAD_COUNT};
use crate::note::parse_note;
use std::fmt;

const FORMAT_VERSION: u32 = 4;
const SLOT_COUNT: u32 = 2;
const MONITORING: u32 = 1;
const TRIGGER_VELOCITY: &str = "0.8";
const PLAYERS: [u32; 2] = [1, 2];

const DATA_ROOT_ID: u32 = 1089220384;
const METADATA_ROOT_ID: u32 = 1089224464;
const MEDIA_TYPE: &str = "ChordPads";

/// Options that change how pads are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Added to every note's octave in the note string. The mask does not
    /// depend on it.
    pub octave_offset: i32,
}

/// A finished `.chordpads` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPreset(String);

impl RenderedPreset {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RenderedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Values computed for one pad before they are written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadAttributes {
    pub key: u8,
    pub mask: u16,
    pub notes: String,
}

impl PadAttributes {
    pub fn from_pad(pad: &Pad, options: &RenderOptions) -> Self {
        let root = analyze_chord_name(&pad.chord_name);
        if root.fallback {
            log::warn!(
                "chord name {:?} has no recognizable root, using {}",
                pad.chord_name,
                root.name
            );
        }

        Self {
            key: root.name.pitch_class(),
            mask: interval_mask(root.name, &pad.notes),
            notes: note_string(&pad.notes, options.octave_offset),
        }
    }
}

/// Join note tokens as `C3;E3;G3;`, shifting each octave by `octave_offset`.
///
/// Tokens that are not valid notes, or whose shifted octave is out of range,
/// are kept as they are. An empty list gives a lone `;`.
///
/// # Examples
/// ```
/// use chordpads::preset::note_string;
///
/// assert_eq!(note_string(&["C3", "E3", "G3"], 0), "C3;E3;G3;");
/// assert_eq!(note_string(&["C3", "E3", "G3"], -2), "C1;E1;G1;");
/// assert_eq!(note_string(&["C3", "??"], 1), "C4;??;");
/// assert_eq!(note_string::<&str>(&[], 0), ";");
/// ```
pub fn note_string<S: AsRef<str>>(notes: &[S], octave_offset: i32) -> String {
    let tokens: Vec<String> = notes
        .iter()
        .map(|token| shift_token(token.as_ref(), octave_offset))
        .collect();
    tokens.join(";") + ";"
}

fn shift_token(token: &str, octave_offset: i32) -> String {
    let note = match parse_note(token) {
        Ok(note) => note,
        Err(e) => {
            log::debug!("keeping note token {:?} unchanged: {}", token, e);
            return token.to_string();
        }
    };
    match note.shifted(octave_offset) {
        Some(shifted) => shifted.to_string(),
        None => {
            log::debug!(
                "keeping note token {:?} unchanged: octave offset {} is out of range",
                token,
                octave_offset
            );
            token.to_string()
        }
    }
}

/// Render a chord set as a `.chordpads` document.
///
/// Pads are numbered from 1 in input order. Callers are expected to pass a
/// chord set with [`PAD_COUNT`] pads; the header always declares that many.
///
/// # Example
/// ```
/// use chordpads::model::{ChordSet, Pad};
/// use chordpads::preset::{render_preset, RenderOptions};
///
/// let set = ChordSet {
///     id: 1,
///     name: "Basics".to_string(),
///     pads: vec![Pad::new("C", &["C3", "E3", "G3"])],
/// };
/// let doc = render_preset(&set, &RenderOptions::default());
/// assert!(doc.as_str().contains(r#"<int name="Mask1" value="72"/>"#));
/// assert!(doc.as_str().contains(r#"<string name="Notes12" value="C3;E3;G3;" wide="true"/>"#));
/// ```
pub fn render_preset(chord_set: &ChordSet, options: &RenderOptions) -> RenderedPreset {
    let mut xml = String::new();

    xml.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push('\n');
    xml.push_str("<chordpads>\n");

    xml.push_str("   <rootObjects>\n");
    xml.push_str(&format!(
        "      <root name=\"chordpadsdata\" ID=\"{}\"/>\n",
        DATA_ROOT_ID
    ));
    xml.push_str(&format!(
        "      <root name=\"metadata\" ID=\"{}\"/>\n",
        METADATA_ROOT_ID
    ));
    xml.push_str("   </rootObjects>\n");

    xml.push_str(&format!(
        "   <obj class=\"Attributes\" ID=\"{}\">\n",
        DATA_ROOT_ID
    ));
    xml.push_str(&int_attr("version", FORMAT_VERSION));
    xml.push_str(&int_attr("padCount", PAD_COUNT));
    xml.push_str(&int_attr("slotCount", SLOT_COUNT));
    xml.push_str(&int_attr("monitoring", MONITORING));
    xml.push_str(&format!(
        "      <float name=\"TriggerVelocity\" value=\"{}\"/>\n",
        TRIGGER_VELOCITY
    ));

    for (i, pad) in chord_set.pads.iter().enumerate() {
        let attributes = PadAttributes::from_pad(pad, options);
        xml.push_str(&pad_to_xml(i + 1, &attributes));
    }

    // Preset files keep a blank line before the closing tag
    xml.push_str("\n   </obj>\n");

    xml.push_str(&format!(
        "   <obj class=\"Attributes\" ID=\"{}\">\n",
        METADATA_ROOT_ID
    ));
    xml.push_str("      <member name=\"Additional Attributes\">\n");
    xml.push_str(&format!(
        "         <string name=\"MediaType\" value=\"{}\"/>\n",
        MEDIA_TYPE
    ));
    xml.push_str("      </member>\n");
    xml.push_str("   </obj>\n");
    xml.push_str("</chordpads>");

    RenderedPreset(xml)
}

fn pad_to_xml(index: usize, pad: &PadAttributes) -> String {
    let mut xml = String::new();

    xml.push_str(&int_attr(&format!("Mask{}", index), pad.mask));
    xml.push_str(&int_attr(&format!("Key{}", index), pad.key));
    // Root position only
    xml.push_str(&int_attr(&format!("Bass{}", index), 0));
    xml.push_str(&int_attr(&format!("orgType{}", index), 0));
    xml.push_str(&int_attr(&format!("ALock{}", index), 1));
    xml.push_str(&int_attr(&format!("Locked{}", index), 1));

    for player in PLAYERS {
        xml.push_str(&int_attr(&format!("VIndex{}{}", index, player), 0));
        xml.push_str(&int_attr(&format!("TIndex{}{}", index, player), 0));
        xml.push_str(&format!(
            "      <string name=\"Notes{}{}\" value=\"{}\" wide=\"true\"/>\n",
            index,
            player,
            escape_xml(&pad.notes)
        ));
    }

    xml
}

fn int_attr(name: &str, value: impl fmt::Display) -> String {
    format!("      <int name=\"{}\" value=\"{}\"/>\n", name, value)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
