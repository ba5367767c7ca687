//! Data model for reviewer batch job generation.
//!
//! Rules are authored as rows of a semicolon-separated table, validated into
//! [`Rule`] records and collected into a [`BatchJobDocument`].

pub mod check_kind;
pub mod document;
pub mod error;
pub mod options;
pub mod rule;
pub mod specials;
pub mod warning;

pub use check_kind::{CheckKind, ConfigKey, GeometryType, KnownKey};
pub use document::BatchJobDocument;
pub use error::{Result, RuleError, RuleField, SpecialsError};
pub use options::{ColumnPolicy, ConversionOptions, SpecialsPolicy};
pub use rule::{Check, DEFAULT_SEVERITY, FeatureClassRef, Rule};
pub use specials::Specials;
pub use warning::RowWarning;
