//! Type-safe enumerations for reviewer check kinds and geometry types.
//!
//! Each check kind carries the fixed catalog data the batch job format
//! needs: the reviewer's long and short names, the GUID identifying the
//! check implementation, the geometry types it applies to and the
//! configuration keys it expects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geometry type of a feature class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeometryType {
    /// Area features (`a`).
    Polygon,
    /// Line features (`l`).
    Polyline,
    /// Point features (`p`).
    Point,
}

impl GeometryType {
    /// Returns the shape type name as reported by the geodatabase.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Polygon => "Polygon",
            GeometryType::Polyline => "Polyline",
            GeometryType::Point => "Point",
        }
    }

    /// Returns the single-letter code (`a`, `l`, `p`).
    pub fn code(&self) -> char {
        match self {
            GeometryType::Polygon => 'a',
            GeometryType::Polyline => 'l',
            GeometryType::Point => 'p',
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GeometryType {
    type Err = String;

    /// Parse a shape type name or its single-letter code (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "POLYGON" | "A" => Ok(GeometryType::Polygon),
            "POLYLINE" | "L" => Ok(GeometryType::Polyline),
            "POINT" | "P" => Ok(GeometryType::Point),
            _ => Err(format!("Unknown shape type: {s}")),
        }
    }
}

/// Recognized keys of the specials mini-language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownKey {
    /// Spatial relation for Geometry on Geometry checks.
    Relation,
    /// Field name for Unique ID checks.
    Field,
    /// Search tolerance for Duplicate Vertex checks.
    Tolerance,
    /// Unit of the tolerance for Duplicate Vertex checks.
    ToleranceUnits,
}

impl KnownKey {
    pub const ALL: [KnownKey; 4] = [
        KnownKey::Relation,
        KnownKey::Field,
        KnownKey::Tolerance,
        KnownKey::ToleranceUnits,
    ];

    /// Canonical (lowercase) spelling of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownKey::Relation => "relation",
            KnownKey::Field => "field",
            KnownKey::Tolerance => "tolerance",
            KnownKey::ToleranceUnits => "toleranceunits",
        }
    }

    /// Matches a key as written in a specials cell (ASCII case-insensitive).
    pub fn matches(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(self.as_str())
    }

    pub fn from_key(key: &str) -> Option<KnownKey> {
        KnownKey::ALL.into_iter().find(|known| known.matches(key))
    }
}

impl fmt::Display for KnownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration keys of a reviewer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigKey {
    CheckAttributes,
    DatasetNames,
    ErrorTypeIsClosed,
    ExcludedAttributes,
    FieldItems,
    FindHoles,
    FindMultipleParts,
    #[serde(rename = "IgnorePLTSMetadata")]
    IgnorePltsMetadata,
    MergeFeatures,
    NotQuery,
    SpatialEnum,
    TablesToQuery,
    Tolerance,
    ToleranceUnits,
}

impl ConfigKey {
    /// Key as written in the batch job.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::CheckAttributes => "CheckAttributes",
            ConfigKey::DatasetNames => "DatasetNames",
            ConfigKey::ErrorTypeIsClosed => "ErrorTypeIsClosed",
            ConfigKey::ExcludedAttributes => "ExcludedAttributes",
            ConfigKey::FieldItems => "FieldItems",
            ConfigKey::FindHoles => "FindHoles",
            ConfigKey::FindMultipleParts => "FindMultipleParts",
            ConfigKey::IgnorePltsMetadata => "IgnorePLTSMetadata",
            ConfigKey::MergeFeatures => "MergeFeatures",
            ConfigKey::NotQuery => "NotQuery",
            ConfigKey::SpatialEnum => "SpatialEnum",
            ConfigKey::TablesToQuery => "TablesToQuery",
            ConfigKey::Tolerance => "Tolerance",
            ConfigKey::ToleranceUnits => "ToleranceUnits",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The nine check kinds the generator can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckKind {
    InvalidGeometry,
    MultipartLine,
    MultipartPolygon,
    NonLinearSegment,
    PolylineClosesOnSelf,
    DuplicateGeometry,
    DuplicateVertex,
    #[serde(rename = "UniqueID")]
    UniqueId,
    GeometryOnGeometry,
}

impl CheckKind {
    /// All kinds in catalog order.
    pub const ALL: [CheckKind; 9] = [
        CheckKind::InvalidGeometry,
        CheckKind::MultipartLine,
        CheckKind::MultipartPolygon,
        CheckKind::NonLinearSegment,
        CheckKind::PolylineClosesOnSelf,
        CheckKind::DuplicateGeometry,
        CheckKind::DuplicateVertex,
        CheckKind::UniqueId,
        CheckKind::GeometryOnGeometry,
    ];

    /// Returns the reviewer's long check name, as written in rule tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::InvalidGeometry => "Invalid Geometry",
            CheckKind::MultipartLine => "Multipart Line",
            CheckKind::MultipartPolygon => "Multipart Polygon",
            CheckKind::NonLinearSegment => "Non-Linear Segment",
            CheckKind::PolylineClosesOnSelf => "Polyline or Path Closes on Self",
            CheckKind::DuplicateGeometry => "Duplicate Geometry",
            CheckKind::DuplicateVertex => "Duplicate Vertex",
            CheckKind::UniqueId => "Unique ID",
            CheckKind::GeometryOnGeometry => "Geometry on Geometry",
        }
    }

    /// Returns the compact identifier (no spaces), also accepted in rule tables.
    pub fn identifier(&self) -> &'static str {
        match self {
            CheckKind::InvalidGeometry => "InvalidGeometry",
            CheckKind::MultipartLine => "MultipartLine",
            CheckKind::MultipartPolygon => "MultipartPolygon",
            CheckKind::NonLinearSegment => "NonLinearSegment",
            CheckKind::PolylineClosesOnSelf => "PolylineClosesOnSelf",
            CheckKind::DuplicateGeometry => "DuplicateGeometry",
            CheckKind::DuplicateVertex => "DuplicateVertex",
            CheckKind::UniqueId => "UniqueID",
            CheckKind::GeometryOnGeometry => "GeometryOnGeometry",
        }
    }

    /// Returns the reviewer's short name, used for secondary resource keys.
    pub fn short_name(&self) -> &'static str {
        match self {
            CheckKind::GeometryOnGeometry => "Geo on Geo",
            other => other.as_str(),
        }
    }

    /// Returns the GUID of the reviewer check implementation.
    pub fn guid(&self) -> &'static str {
        match self {
            CheckKind::InvalidGeometry => "{00D99404-2FC0-437C-B0C1-B39B507BACC4}",
            CheckKind::MultipartLine => "{0AFEF068-ECB2-4CF9-8937-95D45D9528C2}",
            CheckKind::MultipartPolygon => "{21C9EA81-1AED-46D0-8CC1-B34F7E6E7855}",
            CheckKind::NonLinearSegment => "{9F472E55-9799-4CE2-9BDF-CA120E1E4A65}",
            CheckKind::PolylineClosesOnSelf => "{F95E2CE9-85A9-443B-8006-7B0B0C03CBC9}",
            CheckKind::DuplicateGeometry => "{5CEFFFB3-AAA1-4A9F-8750-E8D97443F950}",
            CheckKind::DuplicateVertex => "{1657D1EA-AF38-4B65-B6DE-652D29D61F1D}",
            CheckKind::UniqueId => "{1EF5E608-1B94-4DCF-80B0-5DD6EB855F04}",
            CheckKind::GeometryOnGeometry => "{CA5C29E2-18C9-4702-92A5-6AC810B27181}",
        }
    }

    /// Geometry types for which the check is meaningful.
    pub fn geometry_types(&self) -> &'static [GeometryType] {
        use GeometryType::{Point, Polygon, Polyline};
        match self {
            CheckKind::InvalidGeometry
            | CheckKind::DuplicateGeometry
            | CheckKind::UniqueId
            | CheckKind::GeometryOnGeometry => &[Polygon, Polyline, Point],
            CheckKind::MultipartLine | CheckKind::PolylineClosesOnSelf => &[Polyline],
            CheckKind::MultipartPolygon => &[Polygon],
            CheckKind::NonLinearSegment | CheckKind::DuplicateVertex => &[Polygon, Polyline],
        }
    }

    /// Returns true if the check applies to features of the given geometry type.
    pub fn supports(&self, geometry: GeometryType) -> bool {
        self.geometry_types().contains(&geometry)
    }

    /// Configuration keys the reviewer expects for this check, in document order.
    pub fn config_keys(&self) -> &'static [ConfigKey] {
        use ConfigKey::{
            CheckAttributes, DatasetNames, ErrorTypeIsClosed, ExcludedAttributes, FieldItems,
            FindHoles, FindMultipleParts, IgnorePltsMetadata, MergeFeatures, NotQuery, SpatialEnum,
            TablesToQuery, Tolerance, ToleranceUnits,
        };
        match self {
            CheckKind::InvalidGeometry
            | CheckKind::MultipartLine
            | CheckKind::NonLinearSegment => &[],
            CheckKind::MultipartPolygon => &[FindMultipleParts, FindHoles],
            CheckKind::PolylineClosesOnSelf => &[ErrorTypeIsClosed],
            CheckKind::DuplicateGeometry => {
                &[CheckAttributes, ExcludedAttributes, IgnorePltsMetadata]
            }
            CheckKind::DuplicateVertex => &[Tolerance, ToleranceUnits],
            CheckKind::UniqueId => &[DatasetNames, FieldItems, TablesToQuery],
            CheckKind::GeometryOnGeometry => {
                &[CheckAttributes, MergeFeatures, NotQuery, SpatialEnum]
            }
        }
    }

    /// Specials keys that must be present for a rule of this kind.
    pub fn required_specials(&self) -> &'static [KnownKey] {
        match self {
            CheckKind::GeometryOnGeometry => &[KnownKey::Relation],
            CheckKind::UniqueId => &[KnownKey::Field],
            _ => &[],
        }
    }

    /// Specials keys this kind maps onto target parameters.
    pub fn mapped_specials(&self) -> &'static [KnownKey] {
        match self {
            CheckKind::GeometryOnGeometry => &[KnownKey::Relation],
            CheckKind::UniqueId => &[KnownKey::Field],
            CheckKind::DuplicateVertex => &[KnownKey::Tolerance, KnownKey::ToleranceUnits],
            _ => &[],
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckKind {
    type Err = String;

    /// Parse a check kind from its long name or identifier.
    ///
    /// Matching is exact: rule tables are expected to use the spellings
    /// listed in the catalog.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.identifier() == s)
            .ok_or_else(|| format!("Unknown check kind: {s}"))
    }
}
