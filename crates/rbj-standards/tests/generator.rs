use std::fs;

use rbj_core::{convert_path, convert_reader};
use rbj_model::{Check, CheckKind, ConversionOptions};
use rbj_standards::{
    FeatureClass, generate_rule_tables, load_feature_classes, write_rule_table, write_rule_tables,
};
use tempfile::TempDir;

const LISTING: &str = "\
name;shape;dataset
Topo.Roads;Polyline;Topo
Topo.Lakes;Polygon;Topo
Hydro.Wells;Point;Hydro
Hydro.Terrain;Multipatch;Hydro
";

fn feature_classes() -> Vec<FeatureClass> {
    rbj_standards::read_feature_classes(LISTING.as_bytes()).expect("read listing")
}

fn table_text(kind: CheckKind) -> String {
    let tables = generate_rule_tables(&feature_classes());
    let table = tables
        .iter()
        .find(|table| table.kind == kind)
        .expect("table for kind");
    let mut buffer = Vec::new();
    write_rule_table(&mut buffer, table).expect("write table");
    String::from_utf8(buffer).expect("utf-8")
}

#[test]
fn duplicate_vertex_table_text() {
    insta::assert_snapshot!(table_text(CheckKind::DuplicateVertex), @r"
    type;title;fc1;fcs1;sql1;fc2;fcs2;sql2;severity;notes;specials
    Duplicate Vertex;Roads duplicate vertex;Roads;;;;;;3;;Tolerance=5,ToleranceUnits=cm
    Duplicate Vertex;Lakes duplicate vertex;Lakes;;;;;;3;;Tolerance=5,ToleranceUnits=cm
    ");
}

#[test]
fn duplicate_geometry_table_text() {
    insta::assert_snapshot!(table_text(CheckKind::DuplicateGeometry), @r"
    type;title;fc1;fcs1;sql1;fc2;fcs2;sql2;severity;notes;specials
    Duplicate Geometry;Roads duplicate geometry;Roads;;;Roads;;;3;;
    Duplicate Geometry;Lakes duplicate geometry;Lakes;;;Lakes;;;3;;
    Duplicate Geometry;Wells duplicate geometry;Wells;;;Wells;;;3;;
    ");
}

#[test]
fn generated_tables_convert_with_matching_counts() {
    for table in generate_rule_tables(&feature_classes()) {
        let mut buffer = Vec::new();
        write_rule_table(&mut buffer, &table).expect("write table");
        let assembly = convert_reader(buffer.as_slice(), &ConversionOptions::default())
            .expect("generated table converts");
        assert_eq!(assembly.document.len(), table.rules.len(), "{}", table.kind);
        assert!(assembly.warnings.is_empty(), "{}", table.kind);
        assert!(assembly.document.iter().all(|rule| rule.kind() == table.kind));
    }
}

#[test]
fn generated_duplicate_vertex_rules_carry_tolerance() {
    let tables = generate_rule_tables(&feature_classes());
    let table = tables
        .iter()
        .find(|table| table.kind == CheckKind::DuplicateVertex)
        .expect("duplicate vertex table");
    let mut buffer = Vec::new();
    write_rule_table(&mut buffer, table).expect("write table");
    let assembly =
        convert_reader(buffer.as_slice(), &ConversionOptions::default()).expect("convert");
    assert_eq!(
        assembly.document.rules()[0].check,
        Check::DuplicateVertex {
            tolerance: Some("5".to_string()),
            tolerance_units: Some("cm".to_string()),
        }
    );
}

#[test]
fn writes_one_file_per_table() {
    let dir = TempDir::new().expect("temp dir");
    let listing = dir.path().join("feature_classes.csv");
    fs::write(&listing, LISTING).expect("write listing");

    let feature_classes = load_feature_classes(&listing).expect("load listing");
    assert_eq!(feature_classes.len(), 3);

    let out_dir = dir.path().join("generated");
    let tables = generate_rule_tables(&feature_classes);
    let paths = write_rule_tables(&out_dir, &tables).expect("write tables");
    assert_eq!(paths.len(), tables.len());
    assert!(out_dir.join("Invalid_Geometry.csv").is_file());
    assert!(out_dir.join("Non-Linear_Segment.csv").is_file());

    for (path, table) in paths.iter().zip(&tables) {
        let assembly = convert_path(path, &ConversionOptions::default()).expect("convert file");
        assert_eq!(assembly.document.len(), table.rules.len());
    }
}
