mod common;

use std::path::Path;

use project_parser::{Error, Format, ParserOptions, RecordParser, parser_for};
use proptest::prelude::*;
use serde_json::json;

use common::{TestWorkspace, fixture_path};

fn parser(format: Format) -> Box<dyn RecordParser> {
    parser_for(format, &ParserOptions::default())
}

#[test]
fn every_fixture_yields_mapping_records() {
    for (name, format) in [
        ("test.csv", Format::Csv),
        ("test.json", Format::Json),
        ("test.xml", Format::Xml),
    ] {
        let path = fixture_path(name);
        assert_eq!(Format::detect(&path).unwrap(), format);
        let records = parser(format).parse(&path).expect("fixture parses");
        assert!(!records.is_empty(), "{name} produced no records");
        for record in &records {
            assert!(record.is_object(), "{name} has a non-mapping record: {record}");
        }
    }
}

#[test]
fn nonexistent_path_is_not_found_for_every_parser() {
    let workspace = TestWorkspace::new();
    for format in [Format::Csv, Format::Json, Format::Xml] {
        let missing = workspace.path().join(format!("absent.{format}"));
        let err = parser(format).parse(&missing).unwrap_err();
        assert!(matches!(err, Error::NotFound(ref p) if p == &missing), "{format}: {err:?}");
        assert!(!err.is_parse_error());
    }
}

#[test]
fn parsing_twice_gives_identical_record_sets() {
    for (name, format) in [
        ("test.csv", Format::Csv),
        ("test.json", Format::Json),
        ("test.xml", Format::Xml),
    ] {
        let path = fixture_path(name);
        let first = parser(format).parse(&path).unwrap();
        let second = parser(format).parse(&path).unwrap();
        assert_eq!(first, second, "{name}");
    }
}

#[test]
fn single_row_xml_document() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "one.xml",
        "<root><row><id>1</id><name>Alice</name></row></root>",
    );
    let records = parser(Format::Xml).parse(&path).unwrap();
    assert_eq!(records.into_values(), vec![json!({"id": "1", "name": "Alice"})]);
}

#[test]
fn json_object_root_is_wrapped_and_scalar_root_is_empty() {
    let workspace = TestWorkspace::new();
    let object = workspace.write("object.json", r#"{"a":1}"#);
    let scalar = workspace.write("scalar.json", "42");

    let wrapped = parser(Format::Json).parse(&object).unwrap();
    assert_eq!(wrapped.into_values(), vec![json!({"a": 1})]);
    assert!(parser(Format::Json).parse(&scalar).unwrap().is_empty());
}

#[test]
fn json_passthrough_can_be_rejected_by_strict_callers() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("mixed.json", r#"[{"a": 1}, [1, 2]]"#);
    let records = parser(Format::Json).parse(&path).unwrap();
    assert_eq!(records.len(), 2);

    let err = records.into_records().unwrap_err();
    assert!(matches!(err, Error::Shape { index: 1, kind: "array" }));
}

#[test]
fn parse_document_reports_format_and_source() {
    let path = fixture_path("test.json");
    let document = parser(Format::Json).parse_document(&path).unwrap();
    assert_eq!(document.format, Format::Json);
    assert_eq!(document.source, path);
    assert_eq!(document.records.len(), 3);
}

#[test]
fn unsupported_extension_names_offender() {
    let err = Format::detect(Path::new("archive.tar")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "tar"));
}

fn cell() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,\"\n]{0,12}"
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

proptest! {
    #[test]
    fn csv_yields_one_record_per_row_in_order(
        rows in proptest::collection::vec((cell(), cell()), 0..20)
    ) {
        let workspace = TestWorkspace::new();
        let mut text = String::from("left,right\n");
        for (left, right) in &rows {
            text.push_str(&format!("{},{}\n", quote(left), quote(right)));
        }
        let path = workspace.write("rows.csv", &text);

        let records = parser(Format::Csv).parse(&path).unwrap();
        prop_assert_eq!(records.len(), rows.len());
        for (record, (left, right)) in (&records).into_iter().zip(&rows) {
            prop_assert_eq!(record, &json!({"left": left, "right": right}));
        }
    }

    #[test]
    fn detection_ignores_extension_case(
        stem in "[a-z]{1,8}",
        ext in prop_oneof![Just("csv"), Just("json"), Just("xml")],
        upper in proptest::collection::vec(any::<bool>(), 4)
    ) {
        let mixed: String = ext
            .chars()
            .zip(upper.iter().cycle())
            .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
            .collect();
        let detected = Format::detect(Path::new(&format!("{stem}.{mixed}"))).unwrap();
        prop_assert_eq!(detected.as_str(), ext);
    }
}
