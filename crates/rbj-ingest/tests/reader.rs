use std::fs;

use rbj_ingest::{Column, RuleTableReader};
use rbj_model::{ColumnPolicy, RuleError};
use tempfile::TempDir;

const EXAMPLE_TABLE: &str = "\
;ckind;fcA;fcB;subtype;sql;specials
x;InvalidGeometry;Roads;;;;
x;GeometryOnGeometry;Roads;Parcels;;;relation=Within
;GeometryOnGeometry;Roads;Parcels;;;relation=Within
x;GeometryOnGeometry;Roads;Parcels;;;
";

#[test]
fn reads_rule_table_from_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("rules.csv");
    fs::write(&path, EXAMPLE_TABLE).expect("write table");

    let reader = RuleTableReader::from_path(&path, ColumnPolicy::Strict).expect("open table");
    let rows: Vec<_> = reader.collect::<Result<_, _>>().expect("read rows");

    let lines: Vec<u64> = rows.iter().map(|row| row.line).collect();
    assert_eq!(lines, vec![2, 3, 5]);
    assert_eq!(rows[0].field(Column::CheckKind), Some("InvalidGeometry"));
    assert_eq!(rows[1].field(Column::FeatureClassB), Some("Parcels"));
    assert_eq!(rows[1].field(Column::Specials), Some("relation=Within"));
    assert_eq!(rows[2].non_empty(Column::Specials), None);
}

#[test]
fn unrecognized_columns_are_kept() {
    let input = "type;fc1;owner\nInvalid Geometry;Roads;gis-team\n";
    let mut reader =
        RuleTableReader::from_reader(input.as_bytes(), ColumnPolicy::Strict).expect("header");
    let row = reader.next().expect("row").expect("valid row");
    assert_eq!(row.get("owner"), Some("gis-team"));
    assert!(reader.next().is_none());
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let result = RuleTableReader::from_path(&dir.path().join("absent.csv"), ColumnPolicy::Strict);
    assert!(matches!(result, Err(RuleError::Io(_))));
}

#[test]
fn byte_order_mark_is_stripped_from_header() {
    let input = "\u{feff}type;fc1\nInvalid Geometry;Roads\n";
    let reader =
        RuleTableReader::from_reader(input.as_bytes(), ColumnPolicy::Strict).expect("header");
    let header = reader.header().expect("header");
    assert!(header.binds(Column::CheckKind));
}
