//! # Table Extraction
//!
//! Builds a [`ChordLibrary`] from an HTML page holding the chord set table.
//!
//! ## Table Layout
//! ```text
//! row 1-2   column headings                                   (skipped)
//! row 3     <th>id</th> <th>name</th> <td>chord</td> x 12     header row
//! row 4     <td><p>note</p>...</td> x 12                      notes row
//! row 5-6   next chord set ...
//! ```
//! Column `n` of a row pair is the pad for key `PAD_KEYS[n]`. Notes are written
//! highest first in the table, so each pad's list is reversed to run low to
//! high.
//!
//! The page is read with `quick-xml` in a lenient mode: end tags are not
//! matched against start tags, unquoted attributes are accepted, and common
//! HTML entities are resolved. Cells, rows and paragraphs left open are closed
//! by the next sibling, as an HTML parser would.

use crate::error::ChordPadsError;
use crate::model::{ChordLibrary, ChordSet, Pad, PAD_KEYS};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

/// Rows above the first chord set.
const HEADING_ROWS: usize = 2;

/// Class of the table exported by the wiki the chord sets are kept in.
pub const DEFAULT_TABLE_CLASS: &str = "confluenceTable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Only a `<table>` carrying this class is read. `None` reads the first table.
    pub table_class: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            table_class: Some(DEFAULT_TABLE_CLASS.to_string()),
        }
    }
}

impl ExtractOptions {
    pub fn any_table() -> Self {
        Self { table_class: None }
    }

    fn accepts(&self, table: &BytesStart<'_>) -> bool {
        let required = match &self.table_class {
            Some(class) => class,
            None => return true,
        };
        table.html_attributes().flatten().any(|attr| {
            attr.key.local_name().as_ref().eq_ignore_ascii_case(b"class")
                && String::from_utf8_lossy(&attr.value)
                    .split_whitespace()
                    .any(|class| class == required)
        })
    }
}

/// One `<td>` or `<th>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    pub header: bool,
    /// Cell text with whitespace collapsed.
    pub text: String,
    /// Non-empty `<p>` contents, in document order.
    pub paragraphs: Vec<String>,
}

impl TableCell {
    /// Note tokens in the cell: one per paragraph, or the words of the text
    /// when the cell has no paragraphs.
    pub fn tokens(&self) -> Vec<String> {
        if self.paragraphs.is_empty() {
            self.text.split_whitespace().map(str::to_string).collect()
        } else {
            self.paragraphs.clone()
        }
    }
}

pub type TableRow = Vec<TableCell>;

/// Extract chord sets from an HTML page.
pub fn extract_library(html: &str, options: &ExtractOptions) -> Result<ChordLibrary, ChordPadsError> {
    let rows = read_table_rows(html, options)?;
    rows_to_library(&rows)
}

/// Extract chord sets and serialize them as pretty-printed JSON.
pub fn extract_json(html: &str, options: &ExtractOptions) -> Result<String, ChordPadsError> {
    let library = extract_library(html, options)?;
    serde_json::to_string_pretty(&library).map_err(|e| ChordPadsError::Extract(e.to_string()))
}

/// Read every row of the selected table. Rows of nested tables are ignored.
pub fn read_table_rows(html: &str, options: &ExtractOptions) -> Result<Vec<TableRow>, ChordPadsError> {
    let mut reader = Reader::from_str(html);
    reader.check_end_names(false);

    let mut builder = RowBuilder::default();
    // Table nesting inside the selected table, 0 while outside of it
    let mut depth = 0usize;
    let mut found = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ChordPadsError::Extract(format!(
                "malformed document at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = tag_name(e.local_name().as_ref());
                if depth == 0 {
                    if name == "table" && options.accepts(&e) {
                        depth = 1;
                        found = true;
                    }
                    continue;
                }
                match name.as_str() {
                    "table" => depth += 1,
                    "tr" if depth == 1 => builder.start_row(),
                    "td" | "th" if depth == 1 => builder.start_cell(name == "th"),
                    "p" if depth == 1 => builder.start_paragraph(),
                    "br" => builder.push_text(" "),
                    _ => {}
                }
            }
            Event::Empty(e) if depth > 0 => {
                let name = tag_name(e.local_name().as_ref());
                match name.as_str() {
                    "td" | "th" if depth == 1 => {
                        builder.start_cell(name == "th");
                        builder.end_cell();
                    }
                    "br" => builder.push_text(" "),
                    _ => {}
                }
            }
            Event::End(e) if depth > 0 => {
                let name = tag_name(e.local_name().as_ref());
                match name.as_str() {
                    "table" => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    "tr" if depth == 1 => builder.end_row(),
                    "td" | "th" if depth == 1 => builder.end_cell(),
                    "p" if depth == 1 => builder.end_paragraph(),
                    _ => {}
                }
            }
            Event::Text(text) if depth > 0 => builder.push_text(&unescape_text(&text)),
            Event::CData(data) if depth > 0 => builder.push_text(&String::from_utf8_lossy(&data)),
            Event::Eof => break,
            _ => {}
        }
    }

    if !found {
        return Err(ChordPadsError::Extract(match &options.table_class {
            Some(class) => format!("no table with class \"{}\" found", class),
            None => "no table found".to_string(),
        }));
    }

    Ok(builder.finish())
}

/// Turn table rows into chord sets, see the module docs for the layout.
pub fn rows_to_library(rows: &[TableRow]) -> Result<ChordLibrary, ChordPadsError> {
    let mut chords = Vec::new();

    for start in (HEADING_ROWS..rows.len()).step_by(2) {
        let header_row = &rows[start];
        let notes_row = match rows.get(start + 1) {
            Some(row) => row,
            None => break,
        };
        chords.push(chord_set_from_rows(start + 1, header_row, notes_row)?);
    }

    Ok(ChordLibrary { chords })
}

fn chord_set_from_rows(
    row_number: usize,
    header_row: &[TableCell],
    notes_row: &[TableCell],
) -> Result<ChordSet, ChordPadsError> {
    let headings: Vec<&TableCell> = header_row.iter().filter(|c| c.header).collect();

    let id_text = headings
        .first()
        .map(|c| c.text.as_str())
        .ok_or_else(|| ChordPadsError::Extract(format!("row {}: missing id cell", row_number)))?;
    let id = id_text.parse().map_err(|_| {
        ChordPadsError::Extract(format!(
            "row {}: id \"{}\" is not a non-negative integer",
            row_number, id_text
        ))
    })?;
    let name = headings
        .get(1)
        .map(|c| c.text.clone())
        .ok_or_else(|| ChordPadsError::Extract(format!("row {}: missing name cell", row_number)))?;

    let note_cells: Vec<&TableCell> = notes_row.iter().filter(|c| !c.header).collect();

    let pads = header_row
        .iter()
        .filter(|c| !c.header)
        .enumerate()
        .map(|(column, chord_cell)| {
            let mut notes = note_cells
                .get(column)
                .map(|cell| cell.tokens())
                .unwrap_or_default();
            notes.reverse();
            Pad {
                key: PAD_KEYS.get(column).map(|key| key.to_string()),
                notes,
                chord_name: chord_cell.text.clone(),
            }
        })
        .collect();

    Ok(ChordSet { id, name, pads })
}

#[derive(Default)]
struct RowBuilder {
    rows: Vec<TableRow>,
    row: Option<TableRow>,
    cell: Option<(TableCell, String)>,
    paragraph: Option<String>,
}

impl RowBuilder {
    fn start_row(&mut self) {
        self.end_row();
        self.row = Some(Vec::new());
    }

    fn end_row(&mut self) {
        self.end_cell();
        if let Some(row) = self.row.take() {
            self.rows.push(row);
        }
    }

    fn start_cell(&mut self, header: bool) {
        self.end_cell();
        if self.row.is_none() {
            self.row = Some(Vec::new());
        }
        let cell = TableCell {
            header,
            ..TableCell::default()
        };
        self.cell = Some((cell, String::new()));
    }

    fn end_cell(&mut self) {
        self.end_paragraph();
        if let Some((mut cell, raw)) = self.cell.take() {
            cell.text = collapse_whitespace(&raw);
            if let Some(row) = self.row.as_mut() {
                row.push(cell);
            }
        }
    }

    fn start_paragraph(&mut self) {
        self.end_paragraph();
        if self.cell.is_some() {
            self.paragraph = Some(String::new());
        }
    }

    fn end_paragraph(&mut self) {
        if let Some(raw) = self.paragraph.take() {
            let text = collapse_whitespace(&raw);
            if let Some((cell, cell_text)) = self.cell.as_mut() {
                if !text.is_empty() {
                    cell.paragraphs.push(text);
                }
                // Paragraphs are block-level, keep their words apart
                cell_text.push(' ');
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, raw)) = self.cell.as_mut() {
            raw.push_str(text);
        }
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        }
    }

    fn finish(mut self) -> Vec<TableRow> {
        self.end_row();
        self.rows
    }
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape_text(text: &BytesText<'_>) -> String {
    match text.unescape_with(resolve_html_entity) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}

fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        "sharp" => Some("\u{266f}"),
        "flat" => Some("\u{266d}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        _ => None,
    }
}
