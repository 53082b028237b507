pub mod chord;
pub mod config;
pub mod error;
pub mod extract;
pub mod mask;
pub mod model;
pub mod note;
pub mod pipeline;
pub mod preset;

pub use chord::{analyze_chord_name, chord_root, ChordRoot};
pub use config::{Config, Naming};
pub use error::*;
pub use extract::{extract_json, extract_library, ExtractOptions};
pub use mask::interval_mask;
pub use model::{ChordLibrary, ChordSet, Pad, PAD_COUNT};
pub use note::{parse_note, NoteName, ParsedNote};
pub use pipeline::{convert, run, DirectorySink, PresetFile, PresetSink, RunSummary};
pub use preset::{render_preset, RenderOptions, RenderedPreset};

/// Render a single chord set given as JSON.
/// This is the main entry point for one-off conversions.
pub fn render(chord_set_json: &str, options: &RenderOptions) -> Result<RenderedPreset, ChordPadsError> {
    let chord_set: ChordSet = serde_json::from_str(chord_set_json).map_err(|e| {
        ChordPadsError::InvalidChordSet {
            index: 0,
            message: e.to_string(),
        }
    })?;
    Ok(pipeline::build_preset(&chord_set, options, &Naming::default())?.preset)
}
