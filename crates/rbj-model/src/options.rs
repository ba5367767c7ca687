//! Configuration options for rule conversion.

use serde::{Deserialize, Serialize};

/// Handling of data rows whose cell count differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnPolicy {
    /// Reject the row.
    #[default]
    Strict,
    /// Pad missing trailing cells or drop extra ones, and warn.
    Lenient,
}

/// Handling of specials keys a rule's check kind never maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpecialsPolicy {
    /// Carry them on the rule but leave them out of the batch job.
    #[default]
    Passthrough,
    /// Refuse to serialize rules that carry them.
    Strict,
}

/// Options controlling how rule tables are read.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConversionOptions {
    pub column_policy: ColumnPolicy,
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column_policy(mut self, policy: ColumnPolicy) -> Self {
        self.column_policy = policy;
        self
    }

    /// Options that pad or truncate mismatched rows instead of rejecting them.
    pub fn lenient() -> Self {
        Self {
            column_policy: ColumnPolicy::Lenient,
        }
    }
}
