//! Validated rule records.

use serde::{Deserialize, Serialize};

use crate::check_kind::CheckKind;
use crate::specials::Specials;

/// Severity written when the rule table leaves the column empty.
pub const DEFAULT_SEVERITY: &str = "3";

/// A feature class reference with its optional selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureClassRef {
    /// Feature class name (e.g., "Roads").
    pub name: String,
    /// Subtype selector, attached verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// SQL where-clause, attached verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
}

impl FeatureClassRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtype: None,
            where_clause: None,
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_where_clause(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }
}

/// Check-kind specific part of a rule.
///
/// Each variant carries only the data meaningful to its kind, so a rule
/// that exists always has what its kind requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Check {
    InvalidGeometry,
    MultipartLine,
    MultipartPolygon,
    NonLinearSegment,
    PolylineClosesOnSelf,
    DuplicateGeometry {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secondary: Option<FeatureClassRef>,
    },
    DuplicateVertex {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance_units: Option<String>,
    },
    #[serde(rename = "UniqueID")]
    UniqueId { field: String },
    GeometryOnGeometry {
        secondary: FeatureClassRef,
        relation: String,
    },
}

impl Check {
    pub fn kind(&self) -> CheckKind {
        match self {
            Check::InvalidGeometry => CheckKind::InvalidGeometry,
            Check::MultipartLine => CheckKind::MultipartLine,
            Check::MultipartPolygon => CheckKind::MultipartPolygon,
            Check::NonLinearSegment => CheckKind::NonLinearSegment,
            Check::PolylineClosesOnSelf => CheckKind::PolylineClosesOnSelf,
            Check::DuplicateGeometry { .. } => CheckKind::DuplicateGeometry,
            Check::DuplicateVertex { .. } => CheckKind::DuplicateVertex,
            Check::UniqueId { .. } => CheckKind::UniqueId,
            Check::GeometryOnGeometry { .. } => CheckKind::GeometryOnGeometry,
        }
    }

    /// Secondary feature class, for kinds that compare two inputs.
    pub fn secondary(&self) -> Option<&FeatureClassRef> {
        match self {
            Check::GeometryOnGeometry { secondary, .. } => Some(secondary),
            Check::DuplicateGeometry { secondary } => secondary.as_ref(),
            _ => None,
        }
    }
}

/// A validated rule, ready to be written to a batch job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Line of the rule table the rule came from.
    pub source_line: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub severity: String,
    pub primary: FeatureClassRef,
    pub check: Check,
    #[serde(default, skip_serializing_if = "Specials::is_empty")]
    pub specials: Specials,
}

impl Rule {
    /// Creates a rule with default severity and no title, notes or specials.
    pub fn new(source_line: u64, primary: FeatureClassRef, check: Check) -> Self {
        Self {
            source_line,
            title: None,
            notes: None,
            severity: DEFAULT_SEVERITY.to_string(),
            primary,
            check,
            specials: Specials::default(),
        }
    }

    pub fn kind(&self) -> CheckKind {
        self.check.kind()
    }

    pub fn secondary(&self) -> Option<&FeatureClassRef> {
        self.check.secondary()
    }

    /// Title to display in the reviewer, falling back to "<fc> <kind>".
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => format!(
                "{} {}",
                self.primary.name,
                self.kind().as_str().to_lowercase()
            ),
        }
    }
}
