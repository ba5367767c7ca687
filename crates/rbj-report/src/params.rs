//! Check configuration parameters written for each rule.

use tracing::debug;

use rbj_model::{Check, CheckKind, ConfigKey, Rule, RuleError, SpecialsPolicy};

/// Spatial relations understood by Geometry on Geometry checks.
const SPATIAL_RELATIONS: [(&str, i32); 6] = [
    ("intersects", 1),
    ("touches", 4),
    ("overlaps", 5),
    ("crosses", 6),
    ("within", 7),
    ("contains", 8),
];

/// Units accepted for Duplicate Vertex tolerances.
const TOLERANCE_UNITS: [(&str, i32); 5] = [("mm", 7), ("cm", 8), ("m", 9), ("km", 10), ("points", 2)];

const DEFAULT_TOLERANCE: &str = "1";
const DEFAULT_TOLERANCE_UNITS: i32 = 8;

/// Typed value of a check parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Boolean(bool),
    Int(i32),
    /// Kept as written so the document shows the user's spelling.
    Double(String),
    Strings(Vec<String>),
}

impl ParamValue {
    pub fn xsi_type(&self) -> &'static str {
        match self {
            ParamValue::Boolean(_) => "xs:boolean",
            ParamValue::Int(_) => "xs:int",
            ParamValue::Double(_) => "xs:double",
            ParamValue::Strings(_) => "esri:ArrayOfString",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub key: &'static str,
    pub value: ParamValue,
}

/// A parsed Geometry on Geometry relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialRelation {
    pub negated: bool,
    pub spatial_enum: i32,
}

/// Parse `[not ]<relation>`, ignoring ASCII case.
pub fn parse_relation(relation: &str) -> Option<SpatialRelation> {
    let lowered = relation.trim().to_ascii_lowercase();
    let (negated, name) = match lowered.strip_prefix("not ") {
        Some(rest) => (true, rest.trim()),
        None => (false, lowered.as_str()),
    };
    SPATIAL_RELATIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, spatial_enum)| SpatialRelation {
            negated,
            spatial_enum: *spatial_enum,
        })
}

/// Reviewer code for a tolerance unit (case-insensitive).
pub fn tolerance_unit_code(unit: &str) -> Option<i32> {
    let unit = unit.trim();
    TOLERANCE_UNITS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(unit))
        .map(|(_, code)| *code)
}

/// Resolve every configuration parameter of `rule`, in config key order.
pub fn plan_parameters(rule: &Rule, policy: SpecialsPolicy) -> Result<Vec<Parameter>, RuleError> {
    let kind = rule.kind();
    let unsupported = |feature: String| RuleError::UnsupportedTargetFeature {
        line: rule.source_line,
        kind,
        feature,
    };

    if rule.primary.name.trim().is_empty() {
        return Err(unsupported("blank feature class name".to_string()));
    }
    if rule.secondary().is_some_and(|secondary| secondary.name.trim().is_empty()) {
        return Err(unsupported("blank secondary feature class name".to_string()));
    }
    if let Check::UniqueId { field } = &rule.check
        && field.trim().is_empty()
    {
        return Err(unsupported("blank unique field name".to_string()));
    }

    let mapped = kind.mapped_specials();
    for key in rule.specials.unmapped_keys(mapped) {
        match policy {
            SpecialsPolicy::Strict => {
                return Err(unsupported(format!("specials key `{key}` has no parameter")));
            }
            SpecialsPolicy::Passthrough => {
                debug!(line = rule.source_line, kind = %kind, key, "specials key not mapped, skipping");
            }
        }
    }

    let relation = match &rule.check {
        Check::GeometryOnGeometry { relation, .. } => Some(
            parse_relation(relation)
                .ok_or_else(|| unsupported(format!("unrecognized relation `{relation}`")))?,
        ),
        _ => None,
    };

    let (tolerance, tolerance_units) = match &rule.check {
        Check::DuplicateVertex {
            tolerance,
            tolerance_units,
        } => {
            let tolerance = match tolerance.as_deref() {
                Some(value) => {
                    let value = value.trim();
                    let parsed = value
                        .parse::<f64>()
                        .map_err(|_| unsupported(format!("tolerance `{value}` is not a number")))?;
                    if !parsed.is_finite() || parsed <= 0.0 {
                        return Err(unsupported(format!(
                            "tolerance `{value}` must be a finite positive number"
                        )));
                    }
                    value.to_string()
                }
                None => DEFAULT_TOLERANCE.to_string(),
            };
            let units = match tolerance_units.as_deref() {
                Some(unit) => tolerance_unit_code(unit)
                    .ok_or_else(|| unsupported(format!("unrecognized tolerance unit `{unit}`")))?,
                None => DEFAULT_TOLERANCE_UNITS,
            };
            (tolerance, units)
        }
        _ => (DEFAULT_TOLERANCE.to_string(), DEFAULT_TOLERANCE_UNITS),
    };

    let table_name = rule.primary.name.to_uppercase();
    let parameters = kind
        .config_keys()
        .iter()
        .map(|&key| {
            let value = match key {
                ConfigKey::CheckAttributes
                | ConfigKey::IgnorePltsMetadata
                | ConfigKey::MergeFeatures
                | ConfigKey::FindHoles => ParamValue::Boolean(false),
                ConfigKey::FindMultipleParts | ConfigKey::ErrorTypeIsClosed => {
                    ParamValue::Boolean(true)
                }
                ConfigKey::ExcludedAttributes => ParamValue::Strings(Vec::new()),
                ConfigKey::NotQuery => ParamValue::Boolean(relation.is_some_and(|r| r.negated)),
                ConfigKey::SpatialEnum => ParamValue::Int(relation.map_or(1, |r| r.spatial_enum)),
                ConfigKey::Tolerance => ParamValue::Double(tolerance.clone()),
                ConfigKey::ToleranceUnits => ParamValue::Int(tolerance_units),
                ConfigKey::TablesToQuery | ConfigKey::DatasetNames => {
                    ParamValue::Strings(vec![table_name.clone()])
                }
                ConfigKey::FieldItems => {
                    ParamValue::Strings(unique_field(rule).into_iter().collect())
                }
            };
            Parameter {
                key: key.as_str(),
                value,
            }
        })
        .collect();
    Ok(parameters)
}

fn unique_field(rule: &Rule) -> Option<String> {
    match &rule.check {
        Check::UniqueId { field } => Some(field.clone()),
        _ => None,
    }
}

/// Reviewer configuration schema version for a check kind.
pub fn check_config_version(kind: CheckKind) -> usize {
    4 + kind.config_keys().len()
}
