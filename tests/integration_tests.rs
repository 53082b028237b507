//! Integration tests for the chord pad converter
//!
//! Tests the full path from a wiki table export or JSON library to preset files.

use chordpads::config::Naming;
use chordpads::{
    convert, extract_json, render, run, ChordPadsError, DirectorySink, ExtractOptions,
    PresetFile, RenderOptions,
};
use pretty_assertions::assert_eq;
use std::fs;

fn twelve_pads(chord: &str, notes: &[&str]) -> String {
    let notes: Vec<String> = notes.iter().map(|n| format!("\"{}\"", n)).collect();
    let pad = format!(
        r#"{{"chordName": "{}", "notes": [{}]}}"#,
        chord,
        notes.join(", ")
    );
    format!("[{}]", vec![pad; 12].join(", "))
}

fn expected_document(pad_lines: impl Fn(usize) -> String) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?>
<chordpads>
   <rootObjects>
      <root name="chordpadsdata" ID="1089220384"/>
      <root name="metadata" ID="1089224464"/>
   </rootObjects>
   <obj class="Attributes" ID="1089220384">
      <int name="version" value="4"/>
      <int name="padCount" value="12"/>
      <int name="slotCount" value="2"/>
      <int name="monitoring" value="1"/>
      <float name="TriggerVelocity" value="0.8"/>
"#,
    );
    for i in 1..=12 {
        xml.push_str(&pad_lines(i));
    }
    xml.push_str(
        r#"
   </obj>
   <obj class="Attributes" ID="1089224464">
      <member name="Additional Attributes">
         <string name="MediaType" value="ChordPads"/>
      </member>
   </obj>
</chordpads>"#,
    );
    xml
}

#[test]
fn test_render_full_document() {
    let json = format!(
        r#"{{"id": 1, "name": "Minor", "pads": {}}}"#,
        twelve_pads("Cm", &["C3", "Eb3", "G3"])
    );
    let preset = render(&json, &RenderOptions::default()).unwrap();

    let expected = expected_document(|i| {
        format!(
            r#"      <int name="Mask{i}" value="68"/>
      <int name="Key{i}" value="0"/>
      <int name="Bass{i}" value="0"/>
      <int name="orgType{i}" value="0"/>
      <int name="ALock{i}" value="1"/>
      <int name="Locked{i}" value="1"/>
      <int name="VIndex{i}1" value="0"/>
      <int name="TIndex{i}1" value="0"/>
      <string name="Notes{i}1" value="C3;Eb3;G3;" wide="true"/>
      <int name="VIndex{i}2" value="0"/>
      <int name="TIndex{i}2" value="0"/>
      <string name="Notes{i}2" value="C3;Eb3;G3;" wide="true"/>
"#,
            i = i
        )
    });
    assert_eq!(preset.as_str(), expected);
}

#[test]
fn test_render_rejects_wrong_pad_count() {
    let json = r#"{"id": 1, "name": "Short", "pads": [{"chordName": "C", "notes": ["C3"]}]}"#;
    let err = render(json, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, ChordPadsError::PadCount { found: 1, .. }));
}

#[test]
fn test_convert_names_and_order() {
    let json = format!(
        r#"{{"chords": [
            {{"id": 3, "name": "Neo-Soul / R&B", "pads": {pads}}},
            {{"id": 1, "name": "Grundakkorde", "pads": {pads}}}
        ]}}"#,
        pads = twelve_pads("F#m7", &["F#2", "A2", "C#3", "E3"])
    );
    let results = convert(&json, &RenderOptions::default()).unwrap();
    let names: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().file_name)
        .collect();
    assert_eq!(
        names,
        vec![
            "Roland J-6 - 003 Neo-Soul _ R_B.chordpads".to_string(),
            "Roland J-6 - 001 Grundakkorde.chordpads".to_string(),
        ]
    );
}

#[test]
fn test_octave_offset_in_run() {
    let json = format!(
        r#"{{"chords": [{{"id": 1, "name": "Low", "pads": {}}}]}}"#,
        twelve_pads("G", &["G3", "B3", "D4"])
    );
    let mut sink: Vec<PresetFile> = Vec::new();
    run(
        &json,
        &RenderOptions { octave_offset: -2 },
        &Naming::default(),
        &mut sink,
    )
    .unwrap();

    let xml = sink[0].preset.as_str();
    assert!(xml.contains(r#"<string name="Notes11" value="G1;B1;D2;" wide="true"/>"#));
    // B = 4, D = 7
    assert!(xml.contains(r#"<int name="Mask1" value="72"/>"#));
    assert!(xml.contains(r#"<int name="Key1" value="7"/>"#));
}

#[test]
fn test_extract_then_convert_to_directory() {
    let mut rows = String::new();
    rows.push_str("<tr><th>Nr</th><th>Name</th><th colspan=\"12\">Pads</th></tr>\n");
    rows.push_str("<tr><th></th><th></th><th>C</th><th>C#</th></tr>\n");
    rows.push_str("<tr><th>1</th><th>Pop: Basics</th>");
    for chord in ["C", "G/B", "Am", "F", "Dm7", "Em", "Bb", "Csus4", "E7", "Fm", "Ab", "Gsus2"] {
        rows.push_str(&format!("<td><p>{}</p></td>", chord));
    }
    rows.push_str("</tr>\n<tr><th></th><th></th>");
    for _ in 0..12 {
        rows.push_str("<td><p>G4</p><p>E4</p><p>C4</p></td>");
    }
    rows.push_str("</tr>\n");
    let html = format!(
        "<!DOCTYPE html>\n<html><body><table class=\"confluenceTable\"><tbody>\n{}</tbody></table></body></html>",
        rows
    );

    let json = extract_json(&html, &ExtractOptions::default()).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::create(tmp.path().join("presets")).unwrap();
    let summary = run(&json, &RenderOptions::default(), &Naming::default(), &mut sink).unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.written, vec!["Roland J-6 - 001 Pop_ Basics.chordpads".to_string()]);

    let xml = fs::read_to_string(sink.dir().join(&summary.written[0])).unwrap();
    // Notes are reordered low to high
    assert!(xml.contains(r#"<string name="Notes11" value="C4;E4;G4;" wide="true"/>"#));
    // G/B over C E G: C = 5, E = 9
    assert!(xml.contains(r#"<int name="Key2" value="7"/>"#));
    assert!(xml.contains(r#"<int name="Mask2" value="272"/>"#));
    // Am: C = 3, E = 7
    assert!(xml.contains(r#"<int name="Mask3" value="68"/>"#));
}

#[test]
fn test_rerun_produces_identical_files() {
    let json = format!(
        r#"{{"chords": [{{"id": 12, "name": "Again", "pads": {}}}]}}"#,
        twelve_pads("Ebmaj7", &["Eb3", "G3", "Bb3", "D4"])
    );
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::create(tmp.path()).unwrap();

    run(&json, &RenderOptions::default(), &Naming::default(), &mut sink).unwrap();
    let path = tmp.path().join("Roland J-6 - 012 Again.chordpads");
    let first = fs::read(&path).unwrap();
    run(&json, &RenderOptions::default(), &Naming::default(), &mut sink).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_chords_field() {
    let mut sink: Vec<PresetFile> = Vec::new();
    let err = run(
        r#"{"sets": []}"#,
        &RenderOptions::default(),
        &Naming::default(),
        &mut sink,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Invalid JSON input: 'chords' array is missing");
    assert!(sink.is_empty());
}
