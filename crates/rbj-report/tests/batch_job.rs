use quick_xml::Reader;
use quick_xml::events::Event;
use rbj_core::convert_reader;
use rbj_model::{BatchJobDocument, ConversionOptions, RuleError, SpecialsPolicy};
use rbj_report::{BatchJobOptions, ParamValue, plan, render_batch_job};

const TABLE: &str = "\
type;title;fc1;fcs1;sql1;fc2;fcs2;sql2;severity;notes;specials
Invalid Geometry;;Roads;;\"WIDTH\" > 5;;;;;;
Geometry on Geometry;Roads crossing lakes;Roads;2;;Lakes;;;1;bridges are fine;relation=not crosses
Unique ID;;Buildings;;;;;;;;Field=LOKALID
Duplicate Vertex;;Coast;;;;;;;;Tolerance=0.5,ToleranceUnits=m
";

fn document(table: &str) -> BatchJobDocument {
    convert_reader(table.as_bytes(), &ConversionOptions::default())
        .expect("convert table")
        .document
}

fn options() -> BatchJobOptions {
    BatchJobOptions::new("rules.rbj", r"C:\gis\topo.gdb")
        .with_author("reviewer")
        .with_date("18 October 2026")
}

fn render(document: &BatchJobDocument, options: &BatchJobOptions) -> String {
    String::from_utf8(render_batch_job(document, options).expect("render")).expect("utf-8")
}

#[test]
fn rendering_is_byte_identical() {
    let document = document(TABLE);
    let first = render_batch_job(&document, &options()).expect("render");
    let second = render_batch_job(&document, &options()).expect("render");
    assert_eq!(first, second);
}

#[test]
fn header_carries_job_metadata() {
    let xml = render(&document(TABLE), &options());
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("xsi:type=\"esri:BatchJob\""));
    assert!(xml.contains("<Name>rules.rbj</Name>"));
    assert!(xml.contains("<Creator>reviewer</Creator>"));
    assert!(xml.contains("<EditDate>18 October 2026</EditDate>"));
    assert!(xml.contains("<Name>Auto-generated DR rules</Name>"));
}

#[test]
fn checks_follow_document_order() {
    let xml = render(&document(TABLE), &options());
    let positions: Vec<usize> = [
        "<CheckLongName>Invalid Geometry</CheckLongName>",
        "<CheckLongName>Geometry on Geometry</CheckLongName>",
        "<CheckLongName>Unique ID</CheckLongName>",
        "<CheckLongName>Duplicate Vertex</CheckLongName>",
    ]
    .iter()
    .map(|needle| xml.find(needle).expect("check present"))
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(xml.matches("<RevCheckConfig ").count(), 4);
}

#[test]
fn secondary_reference_is_written_for_geometry_on_geometry() {
    let xml = render(&document(TABLE), &options());
    assert!(xml.contains("<ResourceStringCache>Roads:2, Lakes</ResourceStringCache>"));
    assert!(xml.contains("<Title>Roads crossing lakes</Title>"));
    assert!(xml.contains("<Notes>bridges are fine</Notes>"));
    assert!(xml.contains("<Key>Geo on Geo</Key>"));
    assert!(xml.contains("<String>Geo on Geo</String>"));
    assert_eq!(xml.matches("<SecondaryKeyIndex").count(), 1);
    assert!(xml.contains("<CheckConfigVersion>8</CheckConfigVersion>"));
}

#[test]
fn filters_carry_subtype_and_escaped_sql() {
    let xml = render(&document(TABLE), &options());
    assert!(xml.contains("xsi:type=\"esri:SqlFilter\""));
    assert!(xml.contains("&gt; 5</WhereClause>"));
    assert!(xml.contains("<Subtype>2</Subtype>"));
    // One filter entry and one data source per feature class reference.
    assert_eq!(xml.matches("<DataSource ").count(), 5);
}

#[test]
fn unique_id_points_at_database() {
    let xml = render(&document(TABLE), &options());
    assert!(xml.contains("<ResourceStringCache>topo.gdb</ResourceStringCache>"));
    assert!(xml.contains("<BrowseName>topo</BrowseName>"));
    assert!(xml.contains("<String>BUILDINGS</String>"));
    assert!(xml.contains("<String>LOKALID</String>"));
}

#[test]
fn default_title_uses_feature_class_and_kind() {
    let xml = render(&document(TABLE), &options());
    assert!(xml.contains("<Title>Roads invalid geometry</Title>"));
    assert!(xml.contains("<Severity>3</Severity>"));
    assert!(xml.contains("<Severity>1</Severity>"));
}

#[test]
fn plan_resolves_parameters() {
    let document = document(TABLE);
    let plans = plan(&document, &options()).expect("plan");
    let summary: Vec<String> = plans
        .iter()
        .map(|check| {
            let params: Vec<String> = check
                .parameters
                .iter()
                .map(|p| match &p.value {
                    ParamValue::Boolean(v) => format!("{}={v}", p.key),
                    ParamValue::Int(v) => format!("{}={v}", p.key),
                    ParamValue::Double(v) => format!("{}={v}", p.key),
                    ParamValue::Strings(v) => format!("{}=[{}]", p.key, v.join(",")),
                })
                .collect();
            std::iter::once(check.kind().identifier().to_string())
                .chain(params)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    insta::assert_snapshot!(summary.join("\n"), @r"
    InvalidGeometry
    GeometryOnGeometry CheckAttributes=false MergeFeatures=false NotQuery=true SpatialEnum=6
    UniqueID DatasetNames=[BUILDINGS] FieldItems=[LOKALID] TablesToQuery=[BUILDINGS]
    DuplicateVertex Tolerance=0.5 ToleranceUnits=9
    ");
}

#[test]
fn resource_keys_depend_on_job_name() {
    let document = document(TABLE);
    let first = plan(&document, &options()).expect("plan");
    let renamed = BatchJobOptions::new("other.rbj", r"C:\gis\topo.gdb");
    let second = plan(&document, &renamed).expect("plan");
    assert_ne!(first[0].primary.key, second[0].primary.key);
    assert_ne!(
        first[1].primary.key,
        first[1].secondary.as_ref().expect("secondary").key
    );
}

#[test]
fn unknown_relation_aborts_before_output() {
    let document = document(
        "type;fc1;fc2;specials\nGeometry on Geometry;Roads;Lakes;relation=near\n",
    );
    let err = render_batch_job(&document, &options()).unwrap_err();
    let rule_error = err.downcast_ref::<RuleError>().expect("rule error");
    assert!(matches!(
        rule_error,
        RuleError::UnsupportedTargetFeature { line: 2, .. }
    ));
}

#[test]
fn unknown_tolerance_unit_is_unsupported() {
    let document = document(
        "type;fc1;specials\nDuplicate Vertex;Coast;Tolerance=5,ToleranceUnits=yards\n",
    );
    let err = render_batch_job(&document, &options()).unwrap_err();
    assert!(err.to_string().contains("yards"));
}

#[test]
fn non_finite_or_non_positive_tolerance_is_unsupported() {
    for tolerance in ["inf", "infinity", "NaN", "-1", "0"] {
        let document = document(&format!(
            "type;fc1;specials\nDuplicate Vertex;Coast;Tolerance={tolerance},ToleranceUnits=m\n"
        ));
        let err = render_batch_job(&document, &options()).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<RuleError>(),
                Some(RuleError::UnsupportedTargetFeature { line: 2, .. })
            ),
            "{tolerance}"
        );
    }
}

#[test]
fn document_is_well_formed() {
    let document = document(TABLE);
    let resources: usize = document
        .iter()
        .map(|rule| 1 + usize::from(rule.secondary().is_some()))
        .sum();
    let xml = render(&document, &options());

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);
    let mut stack: Vec<String> = Vec::new();
    let mut filter_entries = 0;
    let mut workspace_entries = 0;
    loop {
        match reader.read_event().expect("well-formed xml") {
            Event::Start(start) => {
                let name = String::from_utf8(start.name().as_ref().to_vec()).expect("utf-8");
                if name == "PropertySetProperty" {
                    match stack.iter().rev().nth(1).map(String::as_str) {
                        Some("Filters") => filter_entries += 1,
                        Some("Workspaces") => workspace_entries += 1,
                        _ => {}
                    }
                }
                stack.push(name);
            }
            Event::End(end) => {
                let open = stack.pop().expect("matching start tag");
                assert_eq!(open.as_bytes(), end.name().as_ref());
            }
            Event::Eof => break,
            _ => {}
        }
    }
    assert!(stack.is_empty(), "unclosed elements: {stack:?}");
    assert_eq!(resources, 5);
    assert_eq!(filter_entries, resources);
    assert_eq!(workspace_entries, resources);
}

#[test]
fn strict_specials_policy_rejects_unmapped_keys() {
    let document = document("type;fc1;specials\nInvalid Geometry;Roads;colour=red\n");
    assert!(render_batch_job(&document, &options()).is_ok());

    let strict = options().with_specials_policy(SpecialsPolicy::Strict);
    let err = render_batch_job(&document, &strict).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RuleError>(),
        Some(RuleError::UnsupportedTargetFeature { .. })
    ));
}

#[test]
fn empty_document_renders_empty_sections() {
    let xml = render(&BatchJobDocument::new(), &options());
    assert!(xml.contains("<Checks xsi:type=\"esri:ArrayOfRevCheckConfig\">"));
    assert!(!xml.contains("<RevCheckConfig"));
}
