//! # Chord Set Pipeline
//!
//! Reads a chord library document, renders every chord set and hands the
//! results to a [`PresetSink`].
//!
//! ## Failure Handling
//! - A document that is not JSON, or has no `chords` array, fails the whole run.
//! - Every chord set is its own unit of work: one that cannot be read, has the
//!   wrong number of pads, or cannot be stored is reported in the
//!   [`RunSummary`] and the remaining chord sets are still processed.
//!
//! ## Artifact Names
//! `<prefix> - <id, 3 digits> <name>.<extension>`, e.g.
//! `Roland J-6 - 001 Pop Ballads.chordpads`. Characters outside
//! `A-Z a-z 0-9 Ä Ö Ü ä ö ü ß`, space and hyphen become `_`.

use crate::config::Naming;
use crate::error::ChordPadsError;
use crate::model::{ChordSet, PAD_COUNT};
use crate::preset::{render_preset, RenderOptions, RenderedPreset};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A rendered chord set together with the file name it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetFile {
    pub id: u32,
    pub file_name: String,
    pub preset: RenderedPreset,
}

/// Replace every character that is not safe in a file name with `_`.
///
/// # Examples
/// ```
/// use chordpads::pipeline::sanitize_name;
///
/// assert_eq!(sanitize_name("Pop/Rock: Vol. 2"), "Pop_Rock_ Vol_ 2");
/// assert_eq!(sanitize_name("Übermäßig"), "Übermäßig");
/// ```
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if is_name_char(c) { c } else { '_' })
        .collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, 'Ä' | 'Ö' | 'Ü' | 'ä' | 'ö' | 'ü' | 'ß' | ' ' | '-')
}

/// File name for a chord set.
///
/// # Example
/// ```
/// use chordpads::config::Naming;
/// use chordpads::pipeline::artifact_name;
///
/// assert_eq!(
///     artifact_name(1, "Jazz & Soul", &Naming::default()),
///     "Roland J-6 - 001 Jazz _ Soul.chordpads"
/// );
/// ```
pub fn artifact_name(id: u32, name: &str, naming: &Naming) -> String {
    format!(
        "{} - {:03} {}.{}",
        naming.product_prefix,
        id,
        sanitize_name(name),
        naming.extension
    )
}

/// Split a library document into its chord sets.
///
/// The outer error is fatal. Each inner result stands for one entry of the
/// `chords` array, in input order.
pub fn parse_library(json: &str) -> Result<Vec<Result<ChordSet, ChordPadsError>>, ChordPadsError> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| ChordPadsError::InvalidJson(e.to_string()))?;

    let entries = match document.get("chords") {
        Some(Value::Array(entries)) => entries,
        _ => return Err(ChordPadsError::MissingChords),
    };

    Ok(entries
        .iter()
        .enumerate()
        .map(|(index, entry)| -> Result<ChordSet, ChordPadsError> {
            let chord_set = ChordSet::deserialize(entry).map_err(|e| {
                ChordPadsError::InvalidChordSet {
                    index,
                    message: e.to_string(),
                }
            })?;
            check_pad_count(&chord_set)?;
            Ok(chord_set)
        })
        .collect())
}

fn check_pad_count(chord_set: &ChordSet) -> Result<(), ChordPadsError> {
    if chord_set.pads.len() != PAD_COUNT {
        return Err(ChordPadsError::PadCount {
            id: chord_set.id,
            found: chord_set.pads.len(),
            expected: PAD_COUNT,
        });
    }
    Ok(())
}

/// Render one chord set and name it.
pub fn build_preset(
    chord_set: &ChordSet,
    options: &RenderOptions,
    naming: &Naming,
) -> Result<PresetFile, ChordPadsError> {
    check_pad_count(chord_set)?;
    Ok(PresetFile {
        id: chord_set.id,
        file_name: artifact_name(chord_set.id, &chord_set.name, naming),
        preset: render_preset(chord_set, options),
    })
}

/// Where rendered presets go.
pub trait PresetSink {
    fn store(&mut self, file: &PresetFile) -> Result<(), ChordPadsError>;
}

/// Collects presets in memory.
impl PresetSink for Vec<PresetFile> {
    fn store(&mut self, file: &PresetFile) -> Result<(), ChordPadsError> {
        self.push(file.clone());
        Ok(())
    }
}

/// Writes each preset as a file into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Use `dir` as the output directory, creating it if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, ChordPadsError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ChordPadsError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PresetSink for DirectorySink {
    fn store(&mut self, file: &PresetFile) -> Result<(), ChordPadsError> {
        let path = self.dir.join(&file.file_name);
        fs::write(&path, file.preset.as_bytes()).map_err(|e| ChordPadsError::io(&path, e))
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// File names stored, in input order.
    pub written: Vec<String>,
    /// Chord sets that were skipped, by position in the input.
    pub failed: Vec<(usize, ChordPadsError)>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Render every chord set of a library document without storing anything.
///
/// # Example
/// ```
/// use chordpads::pipeline::convert;
/// use chordpads::RenderOptions;
///
/// let results = convert(r#"{"chords": [{"id": 1, "name": "Empty", "pads": []}]}"#, &RenderOptions::default())?;
/// assert_eq!(results.len(), 1);
/// assert!(results[0].is_err()); // a chord set needs twelve pads
/// # Ok::<(), chordpads::ChordPadsError>(())
/// ```
pub fn convert(
    json: &str,
    options: &RenderOptions,
) -> Result<Vec<Result<PresetFile, ChordPadsError>>, ChordPadsError> {
    convert_with_naming(json, options, &Naming::default())
}

pub fn convert_with_naming(
    json: &str,
    options: &RenderOptions,
    naming: &Naming,
) -> Result<Vec<Result<PresetFile, ChordPadsError>>, ChordPadsError> {
    Ok(parse_library(json)?
        .into_iter()
        .map(|entry| entry.and_then(|chord_set| build_preset(&chord_set, options, naming)))
        .collect())
}

/// Convert a library document and store every preset in `sink`.
///
/// Returns an error only for problems with the document as a whole.
pub fn run(
    json: &str,
    options: &RenderOptions,
    naming: &Naming,
    sink: &mut dyn PresetSink,
) -> Result<RunSummary, ChordPadsError> {
    let entries = parse_library(json)?;
    Ok(run_entries(entries, options, naming, sink))
}

/// Store every chord set already read by [`parse_library`].
///
/// Entries that failed to parse are reported in the summary as they are.
pub fn run_entries(
    entries: Vec<Result<ChordSet, ChordPadsError>>,
    options: &RenderOptions,
    naming: &Naming,
    sink: &mut dyn PresetSink,
) -> RunSummary {
    log::info!("Processing {} chord sets...", entries.len());

    let mut summary = RunSummary::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let stored = entry
            .and_then(|chord_set| build_preset(&chord_set, options, naming))
            .and_then(|file| sink.store(&file).map(|_| file.file_name));
        match stored {
            Ok(file_name) => {
                log::info!("[OK] {}", file_name);
                summary.written.push(file_name);
            }
            Err(e) => {
                log::error!("Skipping chord set at position {}: {}", index, e);
                summary.failed.push((index, e));
            }
        }
    }

    summary
}
