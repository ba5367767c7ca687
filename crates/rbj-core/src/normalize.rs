//! Validation of raw rows into typed rules.

use tracing::warn;

use rbj_ingest::{Column, RawRow, parse_specials};
use rbj_model::{
    Check, CheckKind, DEFAULT_SEVERITY, FeatureClassRef, KnownKey, Result, RowWarning, Rule,
    RuleError, RuleField, Specials,
};

/// Secondary-reference columns, checked when a kind ignores them.
const SECONDARY_COLUMNS: [Column; 3] = [Column::FeatureClassB, Column::SubtypeB, Column::SqlB];

/// Validate one raw row against its check kind's field policy.
///
/// Fields the kind does not use are dropped; each one that carried a value
/// adds a warning to `warnings`.
pub fn normalize_row(row: &RawRow, warnings: &mut Vec<RowWarning>) -> Result<Rule> {
    let line = row.line;
    let kind = parse_kind(row)?;
    let specials =
        parse_specials(row.field(Column::Specials).unwrap_or_default()).map_err(|source| {
            RuleError::MalformedSpecials { line, source }
        })?;

    let primary = feature_class(row, Column::FeatureClassA, Column::SubtypeA, Column::SqlA)
        .ok_or(RuleError::MissingRequiredField {
            line,
            kind,
            field: RuleField::FeatureClassA,
        })?;

    let check = match kind {
        CheckKind::InvalidGeometry => Check::InvalidGeometry,
        CheckKind::MultipartLine => Check::MultipartLine,
        CheckKind::MultipartPolygon => Check::MultipartPolygon,
        CheckKind::NonLinearSegment => Check::NonLinearSegment,
        CheckKind::PolylineClosesOnSelf => Check::PolylineClosesOnSelf,
        CheckKind::DuplicateGeometry => Check::DuplicateGeometry {
            secondary: secondary(row),
        },
        CheckKind::DuplicateVertex => Check::DuplicateVertex {
            tolerance: specials.known(KnownKey::Tolerance).map(str::to_string),
            tolerance_units: specials.known(KnownKey::ToleranceUnits).map(str::to_string),
        },
        CheckKind::UniqueId => Check::UniqueId {
            field: required_special(&specials, KnownKey::Field, line, kind)?,
        },
        CheckKind::GeometryOnGeometry => {
            let secondary = secondary(row).ok_or(RuleError::MissingRequiredField {
                line,
                kind,
                field: RuleField::FeatureClassB,
            })?;
            let relation = required_special(&specials, KnownKey::Relation, line, kind)?;
            Check::GeometryOnGeometry {
                secondary,
                relation,
            }
        }
    };

    if check.secondary().is_none() {
        warn_ignored(row, kind, warnings);
    }

    Ok(Rule {
        source_line: line,
        title: row.non_empty(Column::Title).map(str::to_string),
        notes: row.non_empty(Column::Notes).map(str::to_string),
        severity: row
            .non_empty(Column::Severity)
            .unwrap_or(DEFAULT_SEVERITY)
            .to_string(),
        primary,
        check,
        specials,
    })
}

fn parse_kind(row: &RawRow) -> Result<CheckKind> {
    let value = row.field(Column::CheckKind).unwrap_or_default();
    value
        .parse::<CheckKind>()
        .map_err(|_| RuleError::UnknownCheckKind {
            line: row.line,
            value: value.to_string(),
        })
}

fn feature_class(
    row: &RawRow,
    name: Column,
    subtype: Column,
    sql: Column,
) -> Option<FeatureClassRef> {
    let mut reference = FeatureClassRef::new(row.non_empty(name)?);
    if let Some(subtype) = row.non_empty(subtype) {
        reference = reference.with_subtype(subtype);
    }
    if let Some(sql) = row.non_empty(sql) {
        reference = reference.with_where_clause(sql);
    }
    Some(reference)
}

fn secondary(row: &RawRow) -> Option<FeatureClassRef> {
    feature_class(row, Column::FeatureClassB, Column::SubtypeB, Column::SqlB)
}

fn required_special(
    specials: &Specials,
    key: KnownKey,
    line: u64,
    kind: CheckKind,
) -> Result<String> {
    specials
        .known(key)
        .map(str::to_string)
        .ok_or(RuleError::MissingRequiredField {
            line,
            kind,
            field: RuleField::Special(key),
        })
}

fn warn_ignored(row: &RawRow, kind: CheckKind, warnings: &mut Vec<RowWarning>) {
    for column in SECONDARY_COLUMNS {
        let Some(value) = row.non_empty(column) else {
            continue;
        };
        warn!(
            line = row.line,
            kind = %kind,
            column = %column,
            value,
            "ignoring column not used by check kind"
        );
        warnings.push(RowWarning::new(
            row.line,
            format!("{kind} rules do not use {column}; ignored `{value}`"),
        ));
    }
}
