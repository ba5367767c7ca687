//! Error taxonomy of the conversion pipeline.
//!
//! Every row-scoped error carries the source line so the rule table can be
//! fixed without re-running with verbose logging.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::check_kind::{CheckKind, KnownKey};

/// Defects in a specials cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecialsError {
    #[error("entry `{entry}` has no `=`")]
    MissingEquals { entry: String },
    #[error("entry `{entry}` has an empty key")]
    EmptyKey { entry: String },
    #[error("key `{key}` appears more than once")]
    DuplicateKey { key: String },
}

/// A rule field that may be required by a check kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleField {
    /// Primary feature class (`fc1`).
    FeatureClassA,
    /// Secondary feature class (`fc2`).
    FeatureClassB,
    /// A key inside the specials cell.
    Special(KnownKey),
}

impl RuleField {
    /// Name of the field as the user writes it in the rule table.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleField::FeatureClassA => "fc1",
            RuleField::FeatureClassB => "fc2",
            RuleField::Special(key) => key.as_str(),
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleField::Special(key) => write!(f, "specials.{key}"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("line {line}: malformed row: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("line {line}: malformed specials: {source}")]
    MalformedSpecials {
        line: u64,
        #[source]
        source: SpecialsError,
    },

    #[error("line {line}: unknown check kind `{value}`")]
    UnknownCheckKind { line: u64, value: String },

    #[error("line {line}: {kind} rule is missing required field {field}")]
    MissingRequiredField {
        line: u64,
        kind: CheckKind,
        field: RuleField,
    },

    #[error("line {line}: {kind} rule cannot be expressed in the batch job: {feature}")]
    UnsupportedTargetFeature {
        line: u64,
        kind: CheckKind,
        feature: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuleError {
    /// Source line of the offending row, when the error is row-scoped.
    pub fn line(&self) -> Option<u64> {
        match self {
            RuleError::MalformedRow { line, .. }
            | RuleError::MalformedSpecials { line, .. }
            | RuleError::UnknownCheckKind { line, .. }
            | RuleError::MissingRequiredField { line, .. }
            | RuleError::UnsupportedTargetFeature { line, .. } => Some(*line),
            RuleError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
