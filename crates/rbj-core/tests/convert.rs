use std::fs;

use rbj_core::{assemble, convert_path, convert_reader};
use rbj_ingest::RawRow;
use rbj_model::{
    Check, CheckKind, ConversionOptions, KnownKey, RuleError, RuleField,
};
use tempfile::TempDir;

const HEADER: &str = ";ckind;fcA;fcB;subtype;sql;specials\n";

fn convert(body: &str) -> Result<rbj_core::Assembly, RuleError> {
    let input = format!("{HEADER}{body}");
    convert_reader(input.as_bytes(), &ConversionOptions::default())
}

#[test]
fn invalid_geometry_row_becomes_rule() {
    let assembly = convert("x;InvalidGeometry;Roads;;;;\n").expect("convert");
    let rules = assembly.document.rules();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].kind(), CheckKind::InvalidGeometry);
    assert_eq!(rules[0].primary.name, "Roads");
    assert_eq!(rules[0].source_line, 2);
    assert!(assembly.warnings.is_empty());
}

#[test]
fn geometry_on_geometry_row_keeps_specials() {
    let assembly = convert("x;GeometryOnGeometry;Roads;Parcels;;;relation=Within\n").expect("convert");
    let rule = &assembly.document.rules()[0];
    assert_eq!(rule.specials.get("relation"), Some("Within"));
    assert_eq!(rule.specials.len(), 1);
    match &rule.check {
        Check::GeometryOnGeometry {
            secondary,
            relation,
        } => {
            assert_eq!(secondary.name, "Parcels");
            assert_eq!(relation, "Within");
        }
        other => panic!("unexpected check: {other:?}"),
    }
}

#[test]
fn comment_row_is_excluded() {
    let assembly = convert(";GeometryOnGeometry;Roads;Parcels;;;relation=Within\n").expect("convert");
    assert!(assembly.document.is_empty());
}

#[test]
fn geometry_on_geometry_without_relation_fails() {
    let err = convert("x;GeometryOnGeometry;Roads;Parcels;;;\n").unwrap_err();
    match err {
        RuleError::MissingRequiredField { line, kind, field } => {
            assert_eq!(line, 2);
            assert_eq!(kind, CheckKind::GeometryOnGeometry);
            assert_eq!(field, RuleField::Special(KnownKey::Relation));
            assert_eq!(field.as_str(), "relation");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unique_id_without_field_fails() {
    let err = convert("x;UniqueID;Buildings;;;;\n").unwrap_err();
    assert!(matches!(
        err,
        RuleError::MissingRequiredField {
            kind: CheckKind::UniqueId,
            field: RuleField::Special(KnownKey::Field),
            ..
        }
    ));
}

#[test]
fn rule_count_matches_data_rows_in_order() {
    let body = "\
x;InvalidGeometry;Roads;;;;
;InvalidGeometry;Commented;;;;
x;Multipart Line;Rivers;;;;
x;DuplicateGeometry;Lakes;Lakes;;;
x;Duplicate Vertex;Coast;;;;Tolerance=5,ToleranceUnits=cm
x;Unique ID;Buildings;;;;Field=LOKALID
";
    let assembly = convert(body).expect("convert");
    let names: Vec<&str> = assembly
        .document
        .iter()
        .map(|rule| rule.primary.name.as_str())
        .collect();
    assert_eq!(names, vec!["Roads", "Rivers", "Lakes", "Coast", "Buildings"]);
    let lines: Vec<u64> = assembly.document.iter().map(|rule| rule.source_line).collect();
    assert_eq!(lines, vec![2, 4, 5, 6, 7]);
}

#[test]
fn first_failing_row_aborts_with_its_line() {
    let body = "\
x;InvalidGeometry;Roads;;;;
x;Overlap Check;Roads;;;;
x;UniqueID;Buildings;;;;
";
    let err = convert(body).unwrap_err();
    assert!(matches!(err, RuleError::UnknownCheckKind { line: 3, ref value } if value == "Overlap Check"));
}

#[test]
fn strict_policy_rejects_short_rows() {
    let err = convert("x;InvalidGeometry;Roads\n").unwrap_err();
    assert!(matches!(err, RuleError::MalformedRow { line: 2, .. }));
}

#[test]
fn lenient_policy_pads_and_warns() {
    let input = format!("{HEADER}x;InvalidGeometry;Roads\n");
    let assembly =
        convert_reader(input.as_bytes(), &ConversionOptions::lenient()).expect("convert");
    assert_eq!(assembly.document.len(), 1);
    assert_eq!(assembly.warnings.len(), 1);
    assert_eq!(assembly.warnings[0].line, 2);
    assert!(assembly.warnings[0].message.contains("expected 7 cells, found 3"));
}

#[test]
fn ignored_secondary_is_reported_as_warning() {
    let assembly = convert("x;InvalidGeometry;Roads;Parcels;;;\n").expect("convert");
    assert_eq!(assembly.document.len(), 1);
    assert_eq!(assembly.warnings.len(), 1);
    assert!(assembly.warnings[0].to_string().starts_with("line 2:"));
}

#[test]
fn empty_table_yields_empty_document() {
    let assembly = convert_reader("".as_bytes(), &ConversionOptions::default()).expect("convert");
    assert!(assembly.document.is_empty());
}

#[test]
fn assemble_propagates_reader_errors() {
    let rows = vec![Err(RuleError::MalformedRow {
        line: 9,
        message: "bad".to_string(),
    })];
    let err = assemble(rows).unwrap_err();
    assert_eq!(err.line(), Some(9));
}

#[test]
fn assemble_accepts_prebuilt_rows() {
    let row = RawRow {
        line: 3,
        cells: vec![
            ("type".to_string(), "Multipart Polygon".to_string()),
            ("fc1".to_string(), "Lakes".to_string()),
        ],
        adjustment: None,
    };
    let assembly = assemble(vec![Ok(row)]).expect("assemble");
    assert_eq!(
        assembly.document.kind_counts(),
        vec![(CheckKind::MultipartPolygon, 1)]
    );
}

#[test]
fn converts_table_from_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("rules.csv");
    fs::write(
        &path,
        "type;title;fc1;fcs1;sql1;fc2;fcs2;sql2;severity;notes;specials\n\
         Geometry on Geometry;Roads in water;Roads;;;Lakes;;;1;check bridges;relation=not intersects\n",
    )
    .expect("write table");

    let assembly = convert_path(&path, &ConversionOptions::default()).expect("convert");
    let rule = &assembly.document.rules()[0];
    assert_eq!(rule.title.as_deref(), Some("Roads in water"));
    assert_eq!(rule.notes.as_deref(), Some("check bridges"));
    assert_eq!(rule.severity, "1");
    assert_eq!(rule.secondary().map(|s| s.name.as_str()), Some("Lakes"));
}
