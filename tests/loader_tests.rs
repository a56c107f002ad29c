mod common;

use seimei::config::DataSources;
use seimei::error::SeimeiError;
use seimei::strokes::loader::{
    load_dictionary, load_dictionary_file, load_overrides, DictionaryColumns,
};
use seimei::strokes::{StrokeSource, StrokeTable};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_dictionary_from_file() {
    let file = temp_file(common::DICTIONARY_CSV);
    let dict = load_dictionary_file(file.path(), &DictionaryColumns::default()).unwrap();
    assert_eq!(dict.entries.len(), 6);
    assert!(dict.entries.contains(&('郎', 14)));
    assert!(dict.coerced.is_empty());
}

#[test]
fn test_dictionary_coerces_bad_values() {
    let csv = "\u{feff}kanji,strokes_old\n田,５\n中,\n太,abc\n郎,-2\n林,8\n";
    let dict = load_dictionary(Cursor::new(csv), &DictionaryColumns::default()).unwrap();

    assert_eq!(
        dict.entries,
        vec![('田', 5), ('中', 0), ('太', 0), ('郎', 0), ('林', 8)]
    );
    assert_eq!(dict.coerced, vec!['中', '太', '郎']);
}

#[test]
fn test_dictionary_skips_bad_keys() {
    let csv = "kanji,strokes_old\n田中,9\n,3\n林,8\n";
    let dict = load_dictionary(Cursor::new(csv), &DictionaryColumns::default()).unwrap();
    assert_eq!(dict.entries, vec![('林', 8)]);
    assert_eq!(dict.skipped, 1);
}

#[test]
fn test_dictionary_missing_column() {
    let csv = "kanji,strokes\n田,5\n";
    let res = load_dictionary(Cursor::new(csv), &DictionaryColumns::default());
    assert!(matches!(res, Err(SeimeiError::Validation(_))));
}

#[test]
fn test_dictionary_custom_columns() {
    let cols = DictionaryColumns {
        key: "char".to_string(),
        value: "count".to_string(),
    };
    let csv = "count,char\n5,田\n";
    let dict = load_dictionary(Cursor::new(csv), &cols).unwrap();
    assert_eq!(dict.entries, vec![('田', 5)]);
}

#[test]
fn test_overrides_prefer_strokes_column() {
    let csv = "kanji,strokes_old,strokes\n田,99,6\n中,4,\n";
    let loaded = load_overrides(Cursor::new(csv), &DictionaryColumns::default()).unwrap();
    // 中 has no usable override and is dropped rather than zeroed
    assert_eq!(loaded.entries, vec![('田', 6)]);
    assert_eq!(loaded.dropped, 1);
}

#[test]
fn test_overrides_fall_back_to_value_column() {
    let csv = "kanji,strokes_old\n田,6\n";
    let loaded = load_overrides(Cursor::new(csv), &DictionaryColumns::default()).unwrap();
    assert_eq!(loaded.entries, vec![('田', 6)]);
}

#[test]
fn test_overrides_count_malformed_records() {
    let csv: &[u8] = b"kanji,strokes\n\xff\xfe,3\n\xe7\x94\xb0,6\n";
    let loaded = load_overrides(Cursor::new(csv), &DictionaryColumns::default()).unwrap();
    assert_eq!(loaded.entries, vec![('田', 6)]);
    assert_eq!(loaded.dropped, 1);
}

#[test]
fn test_full_table_load_layers() {
    let dict = temp_file(common::DICTIONARY_CSV);
    let rules = temp_file(
        r#"{
            "version": "test",
            "relative_groups": [{ "offset": 2, "chars": "太郎" }],
            "absolute_overrides": { "田": 50 },
            "radicals": {
                "assignments": { "浩": "氵" },
                "strokes": { "水": { "offset": 1 } },
                "aliases": { "氵": "水" }
            }
        }"#,
    );
    let overrides = temp_file("kanji,strokes\n田,6\n");

    let sources = DataSources {
        dict: dict.path().to_string_lossy().into_owned(),
        overrides: Some(overrides.path().to_string_lossy().into_owned()),
        rules: Some(rules.path().to_string_lossy().into_owned()),
        ..Default::default()
    };
    let table = StrokeTable::load(&sources).unwrap();

    // override file beats the rule file's absolute override
    assert_eq!(table.resolve('田').strokes, 6);
    assert_eq!(table.resolve('田').source, StrokeSource::Override);
    assert_eq!(table.stroke_of('太'), 6);
    assert_eq!(table.stroke_of('郎'), 16);
    assert_eq!(table.resolve('浩').strokes, 11);
    assert_eq!(table.resolve('浩').source, StrokeSource::Radical);
    assert_eq!(table.stroke_of('中'), 4);
}

#[test]
fn test_missing_dictionary_is_config_error() {
    let sources = DataSources {
        dict: "/nonexistent/dict.csv".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        StrokeTable::load(&sources),
        Err(SeimeiError::Config(_))
    ));
}
